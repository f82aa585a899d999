pub mod activities;
pub mod categories;
pub mod enrollments;
pub mod grades;
pub mod groups;

pub use activities::ActivityService;
pub use categories::CategoryService;
pub use enrollments::EnrollmentService;
pub use grades::GradeService;
pub use groups::GroupService;

//! # Content Library Routes
//!
//! Route groups for the four non-question content kinds an activity item can
//! point at: video lessons, handouts, exercise lists and simulated exams.
//! Each group follows the same create/list/fetch/archive shape.

pub mod exercise_lists;
pub mod handouts;
pub mod simulated_exams;
pub mod video_lessons;

pub use exercise_lists::exercise_list_routes;
pub use handouts::handout_routes;
pub use simulated_exams::simulated_exam_routes;
pub use video_lessons::video_lesson_routes;

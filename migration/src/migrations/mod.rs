pub mod m202601100001_create_users;
pub mod m202601100002_create_topics;
pub mod m202601120001_create_groups;
pub mod m202601150001_create_questions;
pub mod m202601150002_create_content_library;
pub mod m202601200001_create_simulated_exams;
pub mod m202602050001_create_activities;
pub mod m202602050002_create_activity_items;
pub mod m202602100001_create_question_submissions;

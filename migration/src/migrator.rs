use sea_orm_migration::prelude::*;

use crate::migrations;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(migrations::m202601100001_create_users::Migration),
            Box::new(migrations::m202601100002_create_topics::Migration),
            Box::new(migrations::m202601120001_create_groups::Migration),
            Box::new(migrations::m202601150001_create_questions::Migration),
            Box::new(migrations::m202601150002_create_content_library::Migration),
            Box::new(migrations::m202601200001_create_simulated_exams::Migration),
            Box::new(migrations::m202602050001_create_activities::Migration),
            Box::new(migrations::m202602050002_create_activity_items::Migration),
            Box::new(migrations::m202602100001_create_question_submissions::Migration),
        ]
    }
}

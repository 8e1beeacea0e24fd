use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m202602050002_create_activity_items"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Alias::new("activity_items"))
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Alias::new("id"))
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Alias::new("public_id"))
                            .uuid()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Alias::new("activity_id"))
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Alias::new("order_index"))
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Alias::new("title")).string())
                    .col(ColumnDef::new(Alias::new("description")).string())
                    .col(ColumnDef::new(Alias::new("item_type")).text().not_null())
                    .col(ColumnDef::new(Alias::new("question_id")).big_integer())
                    .col(ColumnDef::new(Alias::new("video_lesson_id")).big_integer())
                    .col(ColumnDef::new(Alias::new("handout_id")).big_integer())
                    .col(ColumnDef::new(Alias::new("exercise_list_id")).big_integer())
                    .col(ColumnDef::new(Alias::new("simulated_exam_id")).big_integer())
                    .col(
                        ColumnDef::new(Alias::new("created_at"))
                            .timestamp()
                            .not_null()
                            .default(Expr::cust("CURRENT_TIMESTAMP")),
                    )
                    .col(
                        ColumnDef::new(Alias::new("updated_at"))
                            .timestamp()
                            .not_null()
                            .default(Expr::cust("CURRENT_TIMESTAMP")),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Alias::new("activity_items"), Alias::new("activity_id"))
                            .to(Alias::new("activities"), Alias::new("id"))
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Alias::new("activity_items"), Alias::new("question_id"))
                            .to(Alias::new("questions"), Alias::new("id")),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Alias::new("activity_items"), Alias::new("video_lesson_id"))
                            .to(Alias::new("video_lessons"), Alias::new("id")),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Alias::new("activity_items"), Alias::new("handout_id"))
                            .to(Alias::new("handouts"), Alias::new("id")),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Alias::new("activity_items"), Alias::new("exercise_list_id"))
                            .to(Alias::new("exercise_lists"), Alias::new("id")),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Alias::new("activity_items"), Alias::new("simulated_exam_id"))
                            .to(Alias::new("simulated_exams"), Alias::new("id")),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_activity_items_activity_order")
                    .table(Alias::new("activity_items"))
                    .col(Alias::new("activity_id"))
                    .col(Alias::new("order_index"))
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Storage-layer second line of defense for the exactly-one-of-five
        // content reference invariant. The application constructor is the
        // first line; this catches anything that bypasses it.
        match manager.get_database_backend() {
            // sqlite cannot ALTER TABLE ADD CONSTRAINT; a trigger is the
            // closest equivalent.
            sea_orm::DatabaseBackend::Sqlite => {
                manager
                    .get_connection()
                    .execute_unprepared(
                        "CREATE TRIGGER trg_activity_items_one_content \
                         BEFORE INSERT ON activity_items \
                         WHEN (CASE WHEN NEW.question_id IS NOT NULL THEN 1 ELSE 0 END \
                             + CASE WHEN NEW.video_lesson_id IS NOT NULL THEN 1 ELSE 0 END \
                             + CASE WHEN NEW.handout_id IS NOT NULL THEN 1 ELSE 0 END \
                             + CASE WHEN NEW.exercise_list_id IS NOT NULL THEN 1 ELSE 0 END \
                             + CASE WHEN NEW.simulated_exam_id IS NOT NULL THEN 1 ELSE 0 END) <> 1 \
                         BEGIN \
                             SELECT RAISE(ABORT, 'activity item must reference exactly one content kind'); \
                         END",
                    )
                    .await?;
            }
            _ => {
                manager
                    .get_connection()
                    .execute_unprepared(
                        "ALTER TABLE activity_items ADD CONSTRAINT chk_activity_items_one_content \
                         CHECK ((CASE WHEN question_id IS NOT NULL THEN 1 ELSE 0 END \
                             + CASE WHEN video_lesson_id IS NOT NULL THEN 1 ELSE 0 END \
                             + CASE WHEN handout_id IS NOT NULL THEN 1 ELSE 0 END \
                             + CASE WHEN exercise_list_id IS NOT NULL THEN 1 ELSE 0 END \
                             + CASE WHEN simulated_exam_id IS NOT NULL THEN 1 ELSE 0 END) = 1)",
                    )
                    .await?;
            }
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        if manager.get_database_backend() == sea_orm::DatabaseBackend::Sqlite {
            manager
                .get_connection()
                .execute_unprepared("DROP TRIGGER IF EXISTS trg_activity_items_one_content")
                .await?;
        }
        manager
            .drop_table(Table::drop().table(Alias::new("activity_items")).to_owned())
            .await
    }
}

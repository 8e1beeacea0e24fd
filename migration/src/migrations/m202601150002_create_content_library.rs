use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m202601150002_create_content_library"
    }
}

fn library_table(name: &str, location_col: &str) -> TableCreateStatement {
    Table::create()
        .table(Alias::new(name))
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
        .col(ColumnDef::new(Alias::new("title")).string().not_null())
        .col(ColumnDef::new(Alias::new("description")).string())
        .col(ColumnDef::new(Alias::new(location_col)).string().not_null())
        .col(ColumnDef::new(Alias::new("topic_id")).big_integer())
        .col(
            ColumnDef::new(Alias::new("is_active"))
                .boolean()
                .not_null()
                .default(true),
        )
        .col(
            ColumnDef::new(Alias::new("created_by"))
                .big_integer()
                .not_null(),
        )
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
                .from(Alias::new(name), Alias::new("topic_id"))
                .to(Alias::new("topics"), Alias::new("id"))
                .on_delete(ForeignKeyAction::SetNull),
        )
        .foreign_key(
            ForeignKey::create()
                .from(Alias::new(name), Alias::new("created_by"))
                .to(Alias::new("users"), Alias::new("id")),
        )
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(library_table("video_lessons", "url"))
            .await?;
        manager
            .create_table(library_table("handouts", "storage_key"))
            .await?;
        manager
            .create_table(library_table("exercise_lists", "storage_key"))
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Alias::new("exercise_lists")).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Alias::new("handouts")).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Alias::new("video_lessons")).to_owned())
            .await
    }
}

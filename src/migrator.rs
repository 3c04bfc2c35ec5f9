use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_lookup_tables::Migration),
            Box::new(m20240101_000002_create_taxes_table::Migration),
            Box::new(m20240101_000003_create_products_table::Migration),
            Box::new(m20240101_000004_create_product_link_tables::Migration),
            Box::new(m20240101_000005_create_stock_tables::Migration),
        ]
    }
}

// Migration implementations

mod m20240101_000001_create_lookup_tables {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000001_create_lookup_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Barcodes::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Barcodes::Id)
                                .big_integer()
                                .auto_increment()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Barcodes::Code).string().not_null())
                        .col(ColumnDef::new(Barcodes::BarcodeType).string().null())
                        .col(ColumnDef::new(Barcodes::Description).string().null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_barcodes_code")
                        .table(Barcodes::Table)
                        .col(Barcodes::Code)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Categories::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Categories::Id)
                                .big_integer()
                                .auto_increment()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Categories::Name).string().not_null())
                        .col(ColumnDef::new(Categories::Description).string().null())
                        .col(ColumnDef::new(Categories::ImageUrl).string().null())
                        .col(
                            ColumnDef::new(Categories::Visible)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Statuses::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Statuses::Id)
                                .big_integer()
                                .auto_increment()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Statuses::Name).string().not_null())
                        .col(ColumnDef::new(Statuses::Description).string().null())
                        .col(ColumnDef::new(Statuses::Reference).string().null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(TaxCategories::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(TaxCategories::Id)
                                .big_integer()
                                .auto_increment()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(TaxCategories::Name).string().not_null())
                        .col(ColumnDef::new(TaxCategories::Description).string().null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Labels::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Labels::Id)
                                .big_integer()
                                .auto_increment()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Labels::Name).string().not_null())
                        .col(ColumnDef::new(Labels::Description).string().null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Uoms::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Uoms::Id)
                                .big_integer()
                                .auto_increment()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Uoms::Name).string().not_null())
                        .col(ColumnDef::new(Uoms::Description).string().null())
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Uoms::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Labels::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(TaxCategories::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Statuses::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Categories::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Barcodes::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Barcodes {
        Table,
        Id,
        Code,
        BarcodeType,
        Description,
    }

    #[derive(DeriveIden)]
    pub(super) enum Categories {
        Table,
        Id,
        Name,
        Description,
        ImageUrl,
        Visible,
    }

    #[derive(DeriveIden)]
    pub(super) enum Statuses {
        Table,
        Id,
        Name,
        Description,
        Reference,
    }

    #[derive(DeriveIden)]
    pub(super) enum TaxCategories {
        Table,
        Id,
        Name,
        Description,
    }

    #[derive(DeriveIden)]
    pub(super) enum Labels {
        Table,
        Id,
        Name,
        Description,
    }

    #[derive(DeriveIden)]
    pub(super) enum Uoms {
        Table,
        Id,
        Name,
        Description,
    }
}

mod m20240101_000002_create_taxes_table {

    use sea_orm_migration::prelude::*;

    use super::m20240101_000001_create_lookup_tables::TaxCategories;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000002_create_taxes_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Taxes::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Taxes::Id)
                                .big_integer()
                                .auto_increment()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Taxes::Name).string().not_null())
                        .col(ColumnDef::new(Taxes::Description).string().null())
                        .col(ColumnDef::new(Taxes::Rate).decimal().null())
                        .col(ColumnDef::new(Taxes::TaxType).string().null())
                        .col(ColumnDef::new(Taxes::TaxCategoryId).big_integer().null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_taxes_tax_category")
                                .from(Taxes::Table, Taxes::TaxCategoryId)
                                .to(TaxCategories::Table, TaxCategories::Id),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Taxes::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Taxes {
        Table,
        Id,
        Name,
        Description,
        Rate,
        TaxType,
        TaxCategoryId,
    }
}

mod m20240101_000003_create_products_table {

    use sea_orm_migration::prelude::*;

    use super::m20240101_000001_create_lookup_tables::{
        Barcodes, Categories, Statuses, TaxCategories,
    };

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000003_create_products_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Products::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Products::Id)
                                .big_integer()
                                .auto_increment()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Products::Reference).string().null())
                        .col(ColumnDef::new(Products::SearchKey).string().null())
                        .col(ColumnDef::new(Products::Name).string().not_null())
                        .col(ColumnDef::new(Products::Description).string().null())
                        .col(ColumnDef::new(Products::Sku).string().null())
                        .col(ColumnDef::new(Products::Mpn).string().null())
                        .col(ColumnDef::new(Products::ImageUrl).string().null())
                        .col(
                            ColumnDef::new(Products::Visible)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(ColumnDef::new(Products::DateOfMfd).date().null())
                        .col(ColumnDef::new(Products::DateOfExpiry).date().null())
                        .col(ColumnDef::new(Products::MaximumStockLevel).decimal().null())
                        .col(ColumnDef::new(Products::ReorderLevel).decimal().null())
                        .col(ColumnDef::new(Products::BarcodeId).big_integer().null())
                        .col(ColumnDef::new(Products::CategoryId).big_integer().null())
                        .col(ColumnDef::new(Products::StatusId).big_integer().null())
                        .col(ColumnDef::new(Products::TaxCategoryId).big_integer().null())
                        .col(ColumnDef::new(Products::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(Products::UpdatedAt).timestamp().null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_products_barcode")
                                .from(Products::Table, Products::BarcodeId)
                                .to(Barcodes::Table, Barcodes::Id),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_products_category")
                                .from(Products::Table, Products::CategoryId)
                                .to(Categories::Table, Categories::Id),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_products_status")
                                .from(Products::Table, Products::StatusId)
                                .to(Statuses::Table, Statuses::Id),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_products_tax_category")
                                .from(Products::Table, Products::TaxCategoryId)
                                .to(TaxCategories::Table, TaxCategories::Id),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_products_name")
                        .table(Products::Table)
                        .col(Products::Name)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_products_visible")
                        .table(Products::Table)
                        .col(Products::Visible)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_products_sku")
                        .table(Products::Table)
                        .col(Products::Sku)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_products_date_of_expiry")
                        .table(Products::Table)
                        .col(Products::DateOfExpiry)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Products::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Products {
        Table,
        Id,
        Reference,
        SearchKey,
        Name,
        Description,
        Sku,
        Mpn,
        ImageUrl,
        Visible,
        DateOfMfd,
        DateOfExpiry,
        MaximumStockLevel,
        ReorderLevel,
        BarcodeId,
        CategoryId,
        StatusId,
        TaxCategoryId,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000004_create_product_link_tables {

    use sea_orm_migration::prelude::*;

    use super::m20240101_000001_create_lookup_tables::{Labels, Uoms};
    use super::m20240101_000003_create_products_table::Products;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000004_create_product_link_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(ProductLabels::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ProductLabels::ProductId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ProductLabels::LabelId)
                                .big_integer()
                                .not_null(),
                        )
                        .primary_key(
                            Index::create()
                                .col(ProductLabels::ProductId)
                                .col(ProductLabels::LabelId),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_product_labels_product")
                                .from(ProductLabels::Table, ProductLabels::ProductId)
                                .to(Products::Table, Products::Id),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_product_labels_label")
                                .from(ProductLabels::Table, ProductLabels::LabelId)
                                .to(Labels::Table, Labels::Id),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(ProductUoms::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ProductUoms::ProductId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(ProductUoms::UomId).big_integer().not_null())
                        .primary_key(
                            Index::create()
                                .col(ProductUoms::ProductId)
                                .col(ProductUoms::UomId),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_product_uoms_product")
                                .from(ProductUoms::Table, ProductUoms::ProductId)
                                .to(Products::Table, Products::Id),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_product_uoms_uom")
                                .from(ProductUoms::Table, ProductUoms::UomId)
                                .to(Uoms::Table, Uoms::Id),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Notes::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Notes::Id)
                                .big_integer()
                                .auto_increment()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Notes::Matter).string().not_null())
                        .col(
                            ColumnDef::new(Notes::DateOfCreation)
                                .timestamp()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Notes::ProductId).big_integer().not_null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_notes_product")
                                .from(Notes::Table, Notes::ProductId)
                                .to(Products::Table, Products::Id),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_notes_product_id")
                        .table(Notes::Table)
                        .col(Notes::ProductId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Notes::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(ProductUoms::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(ProductLabels::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum ProductLabels {
        Table,
        ProductId,
        LabelId,
    }

    #[derive(DeriveIden)]
    enum ProductUoms {
        Table,
        ProductId,
        UomId,
    }

    #[derive(DeriveIden)]
    enum Notes {
        Table,
        Id,
        Matter,
        DateOfCreation,
        ProductId,
    }
}

mod m20240101_000005_create_stock_tables {

    use sea_orm_migration::prelude::*;

    use super::m20240101_000001_create_lookup_tables::{Statuses, Uoms};
    use super::m20240101_000003_create_products_table::Products;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000005_create_stock_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Stocks::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Stocks::Id)
                                .big_integer()
                                .auto_increment()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Stocks::Reference).string().null())
                        .col(ColumnDef::new(Stocks::DeliveryNoteRef).big_integer().null())
                        .col(ColumnDef::new(Stocks::DateOfStockAdded).date().null())
                        .col(ColumnDef::new(Stocks::DateOfStockUpdated).date().null())
                        .col(ColumnDef::new(Stocks::StorageCost).decimal().null())
                        .col(ColumnDef::new(Stocks::StatusId).big_integer().null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_stocks_status")
                                .from(Stocks::Table, Stocks::StatusId)
                                .to(Statuses::Table, Statuses::Id),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(StockLines::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(StockLines::Id)
                                .big_integer()
                                .auto_increment()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(StockLines::Reference).string().null())
                        .col(ColumnDef::new(StockLines::BuyPrice).decimal().null())
                        .col(
                            ColumnDef::new(StockLines::SellPriceExclusive)
                                .decimal()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(StockLines::SellPriceInclusive)
                                .decimal()
                                .null(),
                        )
                        .col(ColumnDef::new(StockLines::GrossProfit).decimal().null())
                        .col(ColumnDef::new(StockLines::Margin).decimal().null())
                        .col(
                            ColumnDef::new(StockLines::Units)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(StockLines::SupplierRef).big_integer().null())
                        .col(
                            ColumnDef::new(StockLines::InfrastructureId)
                                .big_integer()
                                .null(),
                        )
                        .col(ColumnDef::new(StockLines::LocationId).string().null())
                        .col(ColumnDef::new(StockLines::ProductId).big_integer().not_null())
                        .col(ColumnDef::new(StockLines::UomId).big_integer().not_null())
                        .col(ColumnDef::new(StockLines::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(StockLines::UpdatedAt).timestamp().null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_stock_lines_product")
                                .from(StockLines::Table, StockLines::ProductId)
                                .to(Products::Table, Products::Id),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_stock_lines_uom")
                                .from(StockLines::Table, StockLines::UomId)
                                .to(Uoms::Table, Uoms::Id),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_stock_lines_product_id")
                        .table(StockLines::Table)
                        .col(StockLines::ProductId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_stock_lines_supplier_ref")
                        .table(StockLines::Table)
                        .col(StockLines::SupplierRef)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(StockStockLines::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(StockStockLines::StockId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(StockStockLines::StockLineId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(StockStockLines::Position)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .primary_key(
                            Index::create()
                                .col(StockStockLines::StockId)
                                .col(StockStockLines::StockLineId),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_stock_stock_lines_stock")
                                .from(StockStockLines::Table, StockStockLines::StockId)
                                .to(Stocks::Table, Stocks::Id),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_stock_stock_lines_stock_line")
                                .from(StockStockLines::Table, StockStockLines::StockLineId)
                                .to(StockLines::Table, StockLines::Id),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(StockStockLines::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(StockLines::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Stocks::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Stocks {
        Table,
        Id,
        Reference,
        DeliveryNoteRef,
        DateOfStockAdded,
        DateOfStockUpdated,
        StorageCost,
        StatusId,
    }

    #[derive(DeriveIden)]
    enum StockLines {
        Table,
        Id,
        Reference,
        BuyPrice,
        SellPriceExclusive,
        SellPriceInclusive,
        GrossProfit,
        Margin,
        Units,
        SupplierRef,
        InfrastructureId,
        LocationId,
        ProductId,
        UomId,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum StockStockLines {
        Table,
        StockId,
        StockLineId,
        Position,
    }
}

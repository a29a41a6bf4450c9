use once_cell::sync::OnceCell;
use sea_orm::{ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, Statement};

static DB_CONN: OnceCell<DatabaseConnection> = OnceCell::new();

/// Create the table when it is missing (minimal schema bootstrap)
async fn ensure_table(
    conn: &DatabaseConnection,
    table: &str,
    create_sql: &str,
) -> anyhow::Result<()> {
    let check = format!(
        "SELECT name FROM sqlite_master WHERE type='table' AND name='{}';",
        table
    );
    let existing = conn
        .query_all(Statement::from_string(DatabaseBackend::Sqlite, check))
        .await?;

    if existing.is_empty() {
        tracing::info!("Creating {} table", table);
        conn.execute(Statement::from_string(
            DatabaseBackend::Sqlite,
            create_sql.to_string(),
        ))
        .await?;
    }
    Ok(())
}

pub async fn initialize_database(db_path: Option<&str>) -> anyhow::Result<()> {
    let db_file = db_path.unwrap_or("target/db/app.db");
    if let Some(parent) = std::path::Path::new(db_file).parent() {
        std::fs::create_dir_all(parent)?;
    }
    let absolute_path = if std::path::Path::new(db_file).is_absolute() {
        std::path::PathBuf::from(db_file)
    } else {
        std::env::current_dir()?.join(db_file)
    };
    // Normalize path separators and ensure proper URL form on Windows
    let normalized = absolute_path.to_string_lossy().replace('\\', "/");
    let needs_leading_slash = !normalized.starts_with('/') && normalized.contains(':');
    let prefix = if needs_leading_slash { "/" } else { "" };
    let db_url = format!("sqlite://{}{}?mode=rwc", prefix, normalized);
    let conn = Database::connect(&db_url).await?;

    ensure_table(
        &conn,
        "a001_supplier",
        r#"
        CREATE TABLE a001_supplier (
            id TEXT PRIMARY KEY NOT NULL,
            code TEXT NOT NULL DEFAULT '',
            description TEXT NOT NULL,
            comment TEXT,
            supplier_type TEXT NOT NULL,
            api_url TEXT NOT NULL DEFAULT '',
            username TEXT,
            password TEXT,
            api_key TEXT,
            default_shipping_fee REAL NOT NULL DEFAULT 0,
            is_active INTEGER NOT NULL DEFAULT 1,
            is_deleted INTEGER NOT NULL DEFAULT 0,
            is_posted INTEGER NOT NULL DEFAULT 0,
            created_at TEXT,
            updated_at TEXT,
            version INTEGER NOT NULL DEFAULT 0
        );
    "#,
    )
    .await?;

    ensure_table(
        &conn,
        "a002_supplier_product",
        r#"
        CREATE TABLE a002_supplier_product (
            id TEXT PRIMARY KEY NOT NULL,
            code TEXT NOT NULL DEFAULT '',
            description TEXT NOT NULL,
            comment TEXT,
            supplier_ref TEXT NOT NULL,
            supplier_sku TEXT NOT NULL,
            cost_price REAL NOT NULL DEFAULT 0,
            list_price REAL,
            stock INTEGER NOT NULL DEFAULT 0,
            shipping_fee REAL NOT NULL DEFAULT 0,
            category TEXT,
            brand TEXT,
            detail_html TEXT,
            status TEXT NOT NULL DEFAULT 'active',
            collected_at TEXT,
            is_deleted INTEGER NOT NULL DEFAULT 0,
            is_posted INTEGER NOT NULL DEFAULT 0,
            created_at TEXT,
            updated_at TEXT,
            version INTEGER NOT NULL DEFAULT 0
        );
    "#,
    )
    .await?;

    ensure_table(
        &conn,
        "a003_marketplace",
        r#"
        CREATE TABLE a003_marketplace (
            id TEXT PRIMARY KEY NOT NULL,
            code TEXT NOT NULL DEFAULT '',
            description TEXT NOT NULL,
            comment TEXT,
            url TEXT NOT NULL,
            marketplace_type TEXT NOT NULL,
            fee_rate REAL NOT NULL DEFAULT 0,
            is_deleted INTEGER NOT NULL DEFAULT 0,
            is_posted INTEGER NOT NULL DEFAULT 0,
            created_at TEXT,
            updated_at TEXT,
            version INTEGER NOT NULL DEFAULT 0
        );
    "#,
    )
    .await?;

    ensure_table(
        &conn,
        "a004_connection_mp",
        r#"
        CREATE TABLE a004_connection_mp (
            id TEXT PRIMARY KEY NOT NULL,
            code TEXT NOT NULL DEFAULT '',
            description TEXT NOT NULL,
            comment TEXT,
            marketplace_ref TEXT NOT NULL,
            vendor_id TEXT,
            access_key TEXT,
            secret_key TEXT,
            client_id TEXT,
            client_secret TEXT,
            api_key TEXT,
            fee_rate_override REAL,
            is_used INTEGER NOT NULL DEFAULT 0,
            test_mode INTEGER NOT NULL DEFAULT 0,
            is_deleted INTEGER NOT NULL DEFAULT 0,
            is_posted INTEGER NOT NULL DEFAULT 0,
            created_at TEXT,
            updated_at TEXT,
            version INTEGER NOT NULL DEFAULT 0
        );
    "#,
    )
    .await?;

    ensure_table(
        &conn,
        "a005_listing",
        r#"
        CREATE TABLE a005_listing (
            id TEXT PRIMARY KEY NOT NULL,
            code TEXT NOT NULL DEFAULT '',
            description TEXT NOT NULL,
            comment TEXT,
            supplier_product_ref TEXT NOT NULL,
            marketplace_ref TEXT NOT NULL,
            connection_mp_ref TEXT NOT NULL,
            marketplace_product_id TEXT,
            sale_title TEXT,
            sale_price REAL NOT NULL DEFAULT 0,
            margin_json TEXT,
            status TEXT NOT NULL DEFAULT 'draft',
            failure_reason TEXT,
            retry_count INTEGER NOT NULL DEFAULT 0,
            registered_at TEXT,
            is_deleted INTEGER NOT NULL DEFAULT 0,
            is_posted INTEGER NOT NULL DEFAULT 0,
            created_at TEXT,
            updated_at TEXT,
            version INTEGER NOT NULL DEFAULT 0
        );
    "#,
    )
    .await?;

    ensure_table(
        &conn,
        "a006_sales_order",
        r#"
        CREATE TABLE a006_sales_order (
            id TEXT PRIMARY KEY NOT NULL,
            code TEXT NOT NULL DEFAULT '',
            description TEXT NOT NULL,
            comment TEXT,
            marketplace_order_no TEXT NOT NULL,
            marketplace_ref TEXT NOT NULL,
            connection_mp_ref TEXT NOT NULL,
            listing_ref TEXT,
            ordered_at TEXT NOT NULL,
            quantity INTEGER NOT NULL DEFAULT 1,
            unit_price REAL NOT NULL DEFAULT 0,
            total_price REAL NOT NULL DEFAULT 0,
            buyer_name TEXT NOT NULL DEFAULT '',
            receiver_name TEXT NOT NULL DEFAULT '',
            receiver_phone TEXT NOT NULL DEFAULT '',
            receiver_address TEXT NOT NULL DEFAULT '',
            receiver_zip TEXT,
            margin_json TEXT,
            status TEXT NOT NULL DEFAULT 'received',
            status_history TEXT NOT NULL DEFAULT '[]',
            failure_reason TEXT,
            retry_count INTEGER NOT NULL DEFAULT 0,
            is_deleted INTEGER NOT NULL DEFAULT 0,
            is_posted INTEGER NOT NULL DEFAULT 0,
            created_at TEXT,
            updated_at TEXT,
            version INTEGER NOT NULL DEFAULT 0
        );
    "#,
    )
    .await?;

    ensure_table(
        &conn,
        "a007_purchase_order",
        r#"
        CREATE TABLE a007_purchase_order (
            id TEXT PRIMARY KEY NOT NULL,
            code TEXT NOT NULL DEFAULT '',
            description TEXT NOT NULL,
            comment TEXT,
            sales_order_ref TEXT NOT NULL,
            supplier_ref TEXT NOT NULL,
            supplier_product_ref TEXT NOT NULL,
            supplier_order_no TEXT,
            quantity INTEGER NOT NULL DEFAULT 1,
            cost_total REAL NOT NULL DEFAULT 0,
            shipping_fee REAL NOT NULL DEFAULT 0,
            tracking_carrier TEXT,
            tracking_no TEXT,
            status TEXT NOT NULL DEFAULT 'created',
            attempt_count INTEGER NOT NULL DEFAULT 0,
            failure_reason TEXT,
            placed_at TEXT,
            is_deleted INTEGER NOT NULL DEFAULT 0,
            is_posted INTEGER NOT NULL DEFAULT 0,
            created_at TEXT,
            updated_at TEXT,
            version INTEGER NOT NULL DEFAULT 0
        );
    "#,
    )
    .await?;

    ensure_table(
        &conn,
        "a008_settlement",
        r#"
        CREATE TABLE a008_settlement (
            id TEXT PRIMARY KEY NOT NULL,
            code TEXT NOT NULL DEFAULT '',
            description TEXT NOT NULL,
            comment TEXT,
            marketplace_ref TEXT NOT NULL,
            period_from TEXT NOT NULL,
            period_to TEXT NOT NULL,
            order_count INTEGER NOT NULL DEFAULT 0,
            gross_revenue REAL NOT NULL DEFAULT 0,
            platform_fees REAL NOT NULL DEFAULT 0,
            product_cost REAL NOT NULL DEFAULT 0,
            shipping_cost REAL NOT NULL DEFAULT 0,
            net_profit REAL NOT NULL DEFAULT 0,
            avg_margin_rate REAL NOT NULL DEFAULT 0,
            status TEXT NOT NULL DEFAULT 'draft',
            is_deleted INTEGER NOT NULL DEFAULT 0,
            is_posted INTEGER NOT NULL DEFAULT 0,
            created_at TEXT,
            updated_at TEXT,
            version INTEGER NOT NULL DEFAULT 0
        );
    "#,
    )
    .await?;

    ensure_table(
        &conn,
        "a009_margin_rule",
        r#"
        CREATE TABLE a009_margin_rule (
            id TEXT PRIMARY KEY NOT NULL,
            code TEXT NOT NULL DEFAULT '',
            description TEXT NOT NULL,
            comment TEXT,
            marketplace_ref TEXT,
            min_margin_rate REAL NOT NULL DEFAULT 0,
            min_profit_amount REAL NOT NULL DEFAULT 0,
            action TEXT NOT NULL DEFAULT 'hold',
            priority INTEGER NOT NULL DEFAULT 0,
            is_enabled INTEGER NOT NULL DEFAULT 1,
            is_deleted INTEGER NOT NULL DEFAULT 0,
            is_posted INTEGER NOT NULL DEFAULT 0,
            created_at TEXT,
            updated_at TEXT,
            version INTEGER NOT NULL DEFAULT 0
        );
    "#,
    )
    .await?;

    ensure_table(
        &conn,
        "a010_notification",
        r#"
        CREATE TABLE a010_notification (
            id TEXT PRIMARY KEY NOT NULL,
            code TEXT NOT NULL DEFAULT '',
            description TEXT NOT NULL,
            comment TEXT,
            level TEXT NOT NULL DEFAULT 'info',
            topic TEXT NOT NULL,
            message TEXT NOT NULL,
            subject_ref TEXT,
            webhook_delivered INTEGER,
            is_deleted INTEGER NOT NULL DEFAULT 0,
            is_posted INTEGER NOT NULL DEFAULT 0,
            created_at TEXT,
            updated_at TEXT,
            version INTEGER NOT NULL DEFAULT 0
        );
    "#,
    )
    .await?;

    ensure_table(
        &conn,
        "p900_profit_register",
        r#"
        CREATE TABLE p900_profit_register (
            marketplace_ref TEXT NOT NULL,
            marketplace_order_no TEXT NOT NULL,
            registrar_ref TEXT NOT NULL,
            settlement_ref TEXT NOT NULL,
            sale_date TEXT NOT NULL,
            quantity INTEGER NOT NULL DEFAULT 0,
            revenue REAL NOT NULL DEFAULT 0,
            platform_fee REAL NOT NULL DEFAULT 0,
            product_cost REAL NOT NULL DEFAULT 0,
            shipping_cost REAL NOT NULL DEFAULT 0,
            profit REAL NOT NULL DEFAULT 0,
            margin_rate REAL NOT NULL DEFAULT 0,
            posted_at TEXT NOT NULL,
            PRIMARY KEY (marketplace_ref, marketplace_order_no)
        );
    "#,
    )
    .await?;

    ensure_table(
        &conn,
        "sys_tasks",
        r#"
        CREATE TABLE sys_tasks (
            id TEXT PRIMARY KEY NOT NULL,
            code TEXT NOT NULL DEFAULT '',
            description TEXT,
            task_type TEXT NOT NULL,
            schedule_cron TEXT,
            config_json TEXT,
            is_enabled INTEGER NOT NULL DEFAULT 0,
            last_run_at TEXT,
            next_run_at TEXT,
            last_run_status TEXT,
            last_run_log_file TEXT,
            is_deleted INTEGER NOT NULL DEFAULT 0,
            created_at TEXT,
            updated_at TEXT
        );
    "#,
    )
    .await?;

    ensure_table(
        &conn,
        "sys_users",
        r#"
        CREATE TABLE sys_users (
            id TEXT PRIMARY KEY NOT NULL,
            username TEXT NOT NULL UNIQUE,
            display_name TEXT NOT NULL DEFAULT '',
            password_hash TEXT NOT NULL,
            is_admin INTEGER NOT NULL DEFAULT 0,
            is_active INTEGER NOT NULL DEFAULT 1,
            refresh_token TEXT,
            refresh_token_expires_at TEXT,
            is_deleted INTEGER NOT NULL DEFAULT 0,
            created_at TEXT,
            updated_at TEXT
        );
    "#,
    )
    .await?;

    ensure_table(
        &conn,
        "sys_settings",
        r#"
        CREATE TABLE sys_settings (
            key TEXT PRIMARY KEY NOT NULL,
            value TEXT NOT NULL
        );
    "#,
    )
    .await?;

    ensure_table(
        &conn,
        "logs",
        r#"
        CREATE TABLE logs (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            level TEXT NOT NULL DEFAULT 'info',
            source TEXT NOT NULL DEFAULT '',
            message TEXT NOT NULL,
            details TEXT,
            created_at TEXT
        );
    "#,
    )
    .await?;

    DB_CONN
        .set(conn)
        .map_err(|_| anyhow::anyhow!("Failed to set DB_CONN"))?;
    Ok(())
}

pub fn get_connection() -> &'static DatabaseConnection {
    DB_CONN
        .get()
        .expect("Database connection has not been initialized")
}

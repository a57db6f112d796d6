use axum::extract::DefaultBodyLimit;
use axum::{
    routing::{get, post},
    Router,
};
use bill_extract_rust::clients::{FsObjectStorage, HttpExpenseAnalyzer};
use bill_extract_rust::db::queries;
use bill_extract_rust::{api, create_pool, AppConfig, BillPipeline, PgBillStore};
use std::sync::Arc;
use tower::ServiceBuilder;
use tracing::info;
use tracing_subscriber::fmt::time::ChronoLocal;

/// 上传体上限 50MB, 与前端约定保持一致
const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 初始化日志 - 使用本地时间格式
    tracing_subscriber::fmt()
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
        .with_target(true)
        .with_level(true)
        .init();

    // 加载配置
    let config = AppConfig::from_env();
    info!("Starting server with config: {:?}", config);

    // 创建数据库连接池并初始化建表
    let pool = create_pool(&config.database.url).await?;
    queries::init_schema(&pool).await?;
    info!("Database pool created, schema ready");

    // 组装流水线: 对象存储 + 分析客户端 + 两种存储同走一个 PG 池
    let storage = Arc::new(FsObjectStorage::new(&config.storage.root));
    let analyzer = Arc::new(HttpExpenseAnalyzer::new(&config.analysis));
    let store = Arc::new(PgBillStore::new(pool));
    let pipeline = Arc::new(BillPipeline::new(
        storage,
        analyzer,
        store.clone(),
        store,
    ));

    // 构建路由
    let app = Router::new()
        .route("/health", get(api::health_check))
        .route("/api/bills/upload", post(api::upload_bill))
        .route("/api/stats", get(api::get_stats))
        .layer(ServiceBuilder::new().layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)))
        .with_state(pipeline);

    // 启动服务器
    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Server listening on {}", addr);
    info!("API Endpoints:");
    info!("  POST /api/bills/upload - multipart receipt upload");
    info!("  GET  /api/stats        - running totals");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

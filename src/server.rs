/*!
 * HTTP 服务器模块
 *
 * 负责启动和运行 HTTP 服务器，协调所有组件的生命周期：
 * - 日志系统初始化
 * - 数据库连接和迁移
 * - 路由和中间件配置
 * - HTTP 服务器启动与优雅停机
 * - 停机后释放数据库连接池
 */

use crate::config::Config;
use crate::database::Database;
use crate::error::{AppError, AppResult};
use crate::handlers::AppState;
use crate::logging;
use crate::routes::create_router;
use crate::service::TodoService;
use axum::serve;
use tokio::net::TcpListener;
use tracing::{info, warn};

/// HTTP 服务器结构体
pub struct Server {
    config: Config,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// 启动并运行服务器，直到收到停止信号
    ///
    /// 启动过程中的任何错误都会导致服务器停止启动：
    /// - 日志系统初始化失败
    /// - 数据库连接或迁移失败
    /// - 端口绑定失败
    pub async fn run(&self) -> AppResult<()> {
        // 日志必须最先配置，后续步骤的日志才能输出
        logging::init_logging(&self.config.log_level, self.config.log_file.as_deref())
            .map_err(|e| AppError::Config(format!("Failed to initialize logging: {}", e)))?;

        info!("Starting Todo Backend v{}", env!("CARGO_PKG_VERSION"));
        info!("Log level: {}", self.config.log_level);

        info!(
            "Connecting to database: {}",
            self.config.redacted_database_url()
        );
        let db = Database::new(&self.config.database_url).await?;
        info!("Database connection established");

        if self.config.auto_migrate {
            info!("Running database migrations (AUTO_MIGRATE=true)...");
            db.migrate().await?;
            info!("Database migrations completed successfully");
        } else {
            info!("Skipping database migrations (AUTO_MIGRATE=false)");
        }

        let state = AppState::new(TodoService::new(db.clone()));
        let app = create_router(state);

        let addr = format!("{}:{}", self.config.server_host, self.config.server_port);
        let listener = TcpListener::bind(&addr).await.map_err(|e| {
            AppError::Config(format!("Failed to bind to address {}: {}", addr, e))
        })?;

        info!("Server listening on http://{}", addr);
        info!("  POST   /api/todos     - Create todo");
        info!("  GET    /api/todos     - List todos");
        info!("  GET    /api/todos/:id - Get todo");
        info!("  PATCH  /api/todos/:id - Update todo");
        info!("  DELETE /api/todos/:id - Delete todo");
        info!("  GET    /health        - Health check");

        let result = serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await;

        // 无论服务是否正常结束，都要释放连接池
        db.close().await;
        info!("Database connections closed");

        result?;
        Ok(())
    }
}

/// 等待 Ctrl-C 或 SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!("Failed to install Ctrl-C handler: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                warn!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, draining in-flight requests");
}

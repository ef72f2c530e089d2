/*!
 * Todo Backend - 待办事项 CRUD API 服务
 *
 * 这是应用程序的主入口点，负责：
 * - 加载环境配置（缺少 DATABASE_URL 时拒绝启动）
 * - 初始化服务器
 * - 启动 HTTP 服务
 */

use todo_backend::{config::Config, server::Server, AppResult};

#[tokio::main]
async fn main() -> AppResult<()> {
    let config = Config::from_env()?;

    let server = Server::new(config);

    server.run().await
}

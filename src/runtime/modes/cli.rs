//! CLI mode

use crate::cli::Commands;
use crate::interfaces::cli::CliError;

/// 执行一条 CLI 子命令（不启动 HTTP 服务器）
pub async fn run_cli(cmd: Commands) -> Result<(), CliError> {
    crate::interfaces::cli::run_cli_command(cmd).await
}

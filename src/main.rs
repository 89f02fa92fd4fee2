use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use dotenv::dotenv;
use human_panic::setup_panic;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, error};

// 从 lib.rs 导入模块
use academic_records::config::{AppConfig, ConfigOverrides};
use academic_records::console::{self, Shell, ShellOutcome};
use academic_records::errors::Result;
use academic_records::runtime::lifetime;
use academic_records::services::{AuthService, DashboardContext, ImportService};
use academic_records::storage::Storage;
use academic_records::utils::password::hash_password;

/// 学籍与成绩管理系统
#[derive(Debug, Parser)]
#[command(name = "academic-records", version, about)]
struct Cli {
    /// 数据库地址，例如 sqlite://academic.db?mode=rwc
    #[arg(long, value_name = "URL")]
    database: Option<String>,

    /// 额外的配置文件
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// 日志级别（覆盖配置）
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<String>,

    /// 登录用户名
    #[arg(short, long)]
    username: Option<String>,

    /// 登录密码（未提供时交互输入）
    #[arg(short, long)]
    password: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// 交互式控制台（默认）
    Shell,
    /// 从目录导入 CSV 数据
    Import {
        #[arg(value_name = "DIR")]
        dir: PathBuf,
    },
}

fn main() {
    dotenv().ok();
    setup_panic!();

    let cli = Cli::parse();

    // 初始化配置
    let overrides = ConfigOverrides {
        config_file: cli.config.clone(),
        database_url: cli.database.clone(),
        log_level: cli.log_level.clone(),
    };
    if let Err(e) = AppConfig::init_with(&overrides) {
        eprintln!("Failed to initialize configuration: {e}");
        std::process::exit(1);
    }
    let config = AppConfig::get();

    // 初始化日志，输出到 stderr 以免干扰控制台
    let (non_blocking_writer, _guard) = tracing_appender::non_blocking(std::io::stderr());
    let filter = tracing_subscriber::EnvFilter::new(&config.app.log_level);
    let tracing_format = tracing_subscriber::fmt::format()
        .with_level(true)
        .with_ansi(true);

    let tracing_builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(non_blocking_writer)
        .event_format(tracing_format);

    if config.is_development() {
        tracing_builder
            .with_file(true)
            .with_line_number(true)
            .init();
    } else {
        tracing_builder.json().init();
    }

    debug!(
        "Starting {} v{} ({})",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        config.app.system_name
    );

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Failed to start async runtime: {e}");
            std::process::exit(1);
        }
    };

    let result = runtime.block_on(run(cli));
    // 密码提示可能仍阻塞在终端读取上，不等待它结束
    runtime.shutdown_background();

    if let Err(e) = result {
        error!("{}", e);
        #[cfg(debug_assertions)]
        eprintln!("{}", e.format_colored());
        #[cfg(not(debug_assertions))]
        eprintln!("{}", e.format_simple());
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let startup = lifetime::startup::prepare_startup().await?;
    let storage = startup.storage;

    match cli.command.unwrap_or(Command::Shell) {
        Command::Import { dir } => import(storage, &dir).await,
        Command::Shell => shell(storage, cli.username, cli.password).await,
    }
}

async fn import(storage: Arc<dyn Storage>, dir: &std::path::Path) -> Result<()> {
    let config = AppConfig::get();
    let password_hash = hash_password(&config.seed.default_password)?;
    let service = ImportService::new(
        storage,
        password_hash,
        config.academic.assumed_course_credits,
    );

    let summary = service.import_dir(dir).await?;
    println!("Import completed from {}", dir.display());
    println!("  students:     {}", summary.students);
    println!("  instructors:  {}", summary.instructors);
    println!("  staff:        {}", summary.staff);
    println!("  departments:  {}", summary.departments);
    println!("  majors:       {}", summary.majors);
    println!("  advisors:     {}", summary.advisors);
    println!("  courses:      {}", summary.courses);
    println!("  sections:     {}", summary.sections);
    println!("  enrollments:  {}", summary.enrollments);
    println!("  skipped rows: {}", summary.skipped);
    for e in &summary.errors {
        println!("  Error: {} row {}: {}", e.file, e.row, e.message);
    }
    Ok(())
}

async fn shell(
    storage: Arc<dyn Storage>,
    mut username: Option<String>,
    mut password: Option<String>,
) -> Result<()> {
    let config = AppConfig::get();
    let auth = AuthService::new(storage.clone());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{}", config.app.system_name);

    loop {
        let Some(session) = console::prompt_login(
            &auth,
            &mut lines,
            username.take(),
            password.take(),
            || rpassword::prompt_password("Password: "),
        )
        .await?
        else {
            return Ok(());
        };

        let ctx = DashboardContext::new(storage.clone(), session, config.academic.clone());
        let shell = Shell::new(ctx);
        match console::run_shell(&shell, &auth, &mut lines).await? {
            ShellOutcome::Exit => return Ok(()),
            ShellOutcome::Logout | ShellOutcome::Output(_) => continue,
        }
    }
}

use clap::{ArgAction, Parser, Subcommand};
use serde::Serialize;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use chrono::{Local, NaiveDateTime};
use roster_features::{ClockTime, ShiftWindow, YearMonth};
use roster_manager_lib::{
    application::commands,
    error::{CommandError, Result, RosterError},
    infrastructure::database::DatabaseOptions,
    AppServices,
};

mod render;

// 引数を構造体として定義します
#[derive(Parser)]
#[command(name = "roster_tools")]
#[command(version = "0.1.0")]
#[command(about = "当番表 (誰がどのシフトに入っているか) を操作します", long_about = None)]
struct Cli {
    /// データベースファイル
    #[arg(long, env = "ROSTER_DB", global = true)]
    db: Option<PathBuf>,

    /// 結果を JSON で出力する
    #[arg(long, global = true)]
    json: bool,

    /// ログを詳しく出す (-v: info, -vv: debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// 現在時刻を上書きする (例: 2026-02-10T09:00)
    #[arg(long, global = true, value_parser = parse_now)]
    at: Option<NaiveDateTime>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// DB を作成し、設定の初期値を入れます
    Init,

    /// 管理者パスワードでログインし、トークンを表示します
    Login {
        #[arg(short, long, env = "ROSTER_PASSWORD")]
        password: String,
    },

    /// トークンを無効にします
    Logout {
        #[arg(short, long, env = "ROSTER_TOKEN")]
        token: String,
    },

    /// 抽出結果 (JSON 配列) を当番表に確定します
    Confirm {
        /// 抽出結果ファイル ("-" で標準入力)
        file: PathBuf,

        #[arg(short, long, env = "ROSTER_TOKEN")]
        token: String,
    },

    /// 今のシフトと勤務中の担当者
    Now,

    /// 月ごとのこれからの予定
    Schedule {
        /// 表示する月 (YYYY-MM)。省略時は今月
        #[arg(short, long)]
        month: Option<YearMonth>,
    },

    /// Now と Schedule をまとめて表示します
    Dashboard {
        #[arg(short, long)]
        month: Option<YearMonth>,
    },

    /// シフト時間帯の設定を表示します
    Settings,

    /// シフト時間帯を丸ごと置き換えます
    SetShifts {
        /// NAME=HH:MM-HH:MM (先に書いたものが優先)
        #[arg(short, long = "window", required = true, value_parser = parse_window)]
        windows: Vec<ShiftWindow>,

        #[arg(short, long, env = "ROSTER_TOKEN")]
        token: String,
    },

    /// 管理者パスワードを変更します
    SetPassword {
        #[arg(long)]
        new_password: String,

        #[arg(short, long, env = "ROSTER_TOKEN")]
        token: String,
    },
}

fn parse_now(s: &str) -> std::result::Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M"))
        .map_err(|e| format!("expected YYYY-MM-DDTHH:MM: {}", e))
}

/// "Night=22:00-06:00"
fn parse_window(s: &str) -> std::result::Result<ShiftWindow, String> {
    let (name, range) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=HH:MM-HH:MM, got `{}`", s))?;
    let (start, end) = range
        .split_once('-')
        .ok_or_else(|| format!("expected HH:MM-HH:MM, got `{}`", range))?;

    let start = start.trim().parse::<ClockTime>().map_err(|e| e.to_string())?;
    let end = end.trim().parse::<ClockTime>().map_err(|e| e.to_string())?;
    ShiftWindow::new(name, start, end).map_err(|e| e.to_string())
}

fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("duty-roster").join("roster.db"))
        .unwrap_or_else(|| PathBuf::from("roster.db"))
}

fn init_logger(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn read_input(file: &Path) -> Result<String> {
    if file.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        Ok(fs::read_to_string(file)?)
    }
}

fn emit<T: Serialize>(json: bool, value: &T, text: impl FnOnce(&T)) {
    if json {
        match serde_json::to_string_pretty(value) {
            Ok(s) => println!("{}", s),
            Err(e) => eprintln!("JSON への変換に失敗しました: {}", e),
        }
    } else {
        text(value);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let db_path = cli.db.clone().unwrap_or_else(default_db_path);
    let services = AppServices::bootstrap(&DatabaseOptions::new(db_path)).await?;
    let now = cli.at.unwrap_or_else(|| Local::now().naive_local());
    let json = cli.json;

    // パターンマッチで分岐処理
    match cli.command {
        Commands::Init => {
            let view = commands::get_settings_view(&services).await?;
            emit(json, &view, |v| {
                println!("初期化しました (settings v{})", v.version);
                render::print_shift_times(&v.shift_times);
            });
        }
        Commands::Login { password } => {
            let session = commands::login(&password, now, &services).await?;
            emit(json, &session, |s| println!("{}", s.token));
        }
        Commands::Logout { token } => {
            commands::logout(&token, &services).await?;
        }
        Commands::Confirm { file, token } => {
            let raw = read_input(&file)?;
            let result = commands::confirm_roster(&token, &raw, now, &services).await?;
            emit(json, &result, |r| println!("{} 件を確定しました", r.applied));
        }
        Commands::Now => {
            let duty = commands::get_on_duty(now, &services).await?;
            emit(json, &duty, render::print_on_duty);
        }
        Commands::Schedule { month } => {
            let schedule = commands::get_schedule(now, month, &services).await?;
            emit(json, &schedule, render::print_schedule);
        }
        Commands::Dashboard { month } => {
            let dashboard = commands::get_dashboard(now, month, &services).await?;
            emit(json, &dashboard, |d| {
                render::print_on_duty(&d.on_duty);
                println!();
                render::print_schedule(&d.schedule);
            });
        }
        Commands::Settings => {
            let view = commands::get_settings_view(&services).await?;
            emit(json, &view, |v| render::print_shift_times(&v.shift_times));
        }
        Commands::SetShifts { windows, token } => {
            let catalog = commands::set_shift_times(&token, windows, now, &services).await?;
            emit(json, &catalog, render::print_shift_times);
        }
        Commands::SetPassword { new_password, token } => {
            commands::set_admin_password(&token, &new_password, now, &services).await?;
            if !json {
                println!("パスワードを変更しました。再度ログインしてください");
            }
        }
    }
    Ok(())
}

fn report(err: &RosterError, json: bool) {
    if json {
        let dto = CommandError::from(err);
        match serde_json::to_string(&dto) {
            Ok(s) => eprintln!("{}", s),
            Err(_) => eprintln!("{}", err),
        }
    } else {
        eprintln!("エラー: {}", err);
        if err.is_retryable() {
            eprintln!("同じ内容で再実行できます");
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logger(cli.verbose);
    let json = cli.json;

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::debug!("command failed: {:?}", e);
            report(&e, json);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod cli_tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_window() {
        let night = parse_window("Night=22:00-06:00").unwrap();
        assert_eq!(night.name, "Night");
        assert!(night.wraps_midnight());

        assert!(parse_window("Night").is_err());
        assert!(parse_window("Night=22:00").is_err());
        assert!(parse_window("Night=22:00-22:00").is_err());
        assert!(parse_window("=08:00-16:00").is_err());
    }

    #[test]
    fn test_parse_now() {
        let a = parse_now("2026-02-10T09:00").unwrap();
        let b = parse_now("2026-02-10 09:00").unwrap();
        assert_eq!(a, b);
        assert!(parse_now("09:00").is_err());
    }

    #[test]
    fn test_parse_subcommands() {
        let cli = Cli::try_parse_from([
            "roster_tools",
            "--at",
            "2026-02-10T09:00",
            "set-shifts",
            "--token",
            "abc",
            "-w",
            "Day=06:00-22:00",
            "-w",
            "Night=22:00-06:00",
        ])
        .unwrap();
        match cli.command {
            Commands::SetShifts { windows, token } => {
                assert_eq!(token, "abc");
                assert_eq!(windows.len(), 2);
            }
            _ => panic!("expected set-shifts"),
        }

        let cli = Cli::try_parse_from(["roster_tools", "schedule", "--month", "2026-12"]).unwrap();
        match cli.command {
            Commands::Schedule { month } => assert_eq!(month, Some(YearMonth::new(2026, 12).unwrap())),
            _ => panic!("expected schedule"),
        }
    }
}

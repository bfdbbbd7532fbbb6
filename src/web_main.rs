//! Web 服务器主程序入口

use civiclens_translate::translation::ConfigManager;
use civiclens_translate::web::{WebConfig, WebServer};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    civiclens_translate::init_tracing();

    // 解析命令行参数
    let args: Vec<String> = std::env::args().collect();

    let mut web_config = WebConfig::default();
    let mut config_path: Option<String> = None;

    // 简单的命令行参数解析
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--bind" | "-b" => {
                if i + 1 < args.len() {
                    web_config.bind_addr = args[i + 1].clone();
                    i += 2;
                } else {
                    eprintln!("Error: --bind requires an address");
                    std::process::exit(1);
                }
            }
            "--port" | "-p" => {
                if i + 1 < args.len() {
                    web_config.port = args[i + 1].parse().unwrap_or_else(|_| {
                        eprintln!("Error: Invalid port number");
                        std::process::exit(1);
                    });
                    i += 2;
                } else {
                    eprintln!("Error: --port requires a port number");
                    std::process::exit(1);
                }
            }
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    config_path = Some(args[i + 1].clone());
                    i += 2;
                } else {
                    eprintln!("Error: --config requires a path");
                    std::process::exit(1);
                }
            }
            "--help" | "-h" => {
                print_help();
                return Ok(());
            }
            _ => {
                eprintln!("Error: Unknown argument: {}", args[i]);
                print_help();
                std::process::exit(1);
            }
        }
    }

    let manager = match config_path {
        Some(path) => ConfigManager::from_file(path)?,
        None => ConfigManager::new()?,
    };

    let server = WebServer::new(web_config, manager.into_config());
    server.start().await?;

    Ok(())
}

fn print_help() {
    println!("CivicLens Translation Server");
    println!();
    println!("USAGE:");
    println!("    civiclens-web [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    -b, --bind <ADDRESS>     Bind address [default: 127.0.0.1]");
    println!("    -p, --port <PORT>        Port number [default: 5000]");
    println!("    -c, --config <PATH>      Translation config file (TOML or JSON)");
    println!("    -h, --help               Print help information");
    println!();
    println!("EXAMPLES:");
    println!("    civiclens-web");
    println!("    civiclens-web --bind 0.0.0.0 --port 5000");
}

mod clock;
mod config;
mod logging;
mod persistence;
mod session;

use std::io::{self, BufRead, Write};

use anyhow::bail;
use console_core::BulkAction;

use config::AppConfig;
use session::PageSession;

fn main() -> anyhow::Result<()> {
    logging::initialize(logging::LogDestination::Terminal);
    let config = AppConfig::from_env()?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    let verb = args.first().map(String::as_str).unwrap_or("load");

    let mut session = PageSession::new(config)?;
    match verb {
        // Simulates a page load, optionally with the query string a bulk
        // redirect came back with (including jobs=1 to wait, then refresh).
        "load" => {
            session.bootstrap(args.get(1).map(String::as_str));
        }
        "refresh" => {
            session.bootstrap(None);
            session.refresh();
        }
        "bulk" => {
            let Some(action) = args.get(1).and_then(|tag| BulkAction::from_tag(tag)) else {
                bail!("usage: console_app bulk <start|poweroff|restore> <node|vmid|name>...");
            };
            session.bootstrap(None);
            session.set_targets(&args[2..]);
            if let Some(request) = session.run_bulk(action, confirm_on_stdin) {
                // Dispatch is the page's job; print the form fields it posts.
                println!("action={}", request.action.tag());
                for target in &request.targets {
                    println!("vms={}", target.form_value());
                }
            }
        }
        "console" => {
            let (Some(node), Some(vmid)) = (args.get(1), args.get(2)) else {
                bail!("usage: console_app console <node> <vmid>");
            };
            session.bootstrap(None);
            session.open_console(node, vmid);
        }
        "clear" => {
            session.bootstrap(None);
            session.clear_log();
        }
        other => bail!("unknown command {other:?} (expected load, refresh, bulk, console, clear)"),
    }

    for line in session.log_lines() {
        println!("{line}");
    }
    Ok(())
}

fn confirm_on_stdin(prompt: &str) -> bool {
    print!("{prompt}\n[y/N] ");
    let _ = io::stdout().flush();
    let mut answer = String::new();
    if io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim(), "y" | "Y" | "yes")
}

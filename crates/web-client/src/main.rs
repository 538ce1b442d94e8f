//! todo-app: 端末で動く ToDo フロントエンド

use anyhow::Context;
use shared::{init_tracing, Config};
use tokio::io::{AsyncBufReadExt, BufReader};
use web_client::components::Page;
use web_client::terminal::{apply, parse_command, Flow, HELP};
use web_client::TodoApiClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing().map_err(|e| anyhow::anyhow!(e))?;
    let config = Config::from_env().context("failed to load configuration")?;

    let mut page = Page::new(TodoApiClient::new(&config.api_url));
    page.mount().await;
    println!("{}", page.render());
    println!("Type 'help' for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        let command = parse_command(&line, page.list.pending_delete().is_some());
        let (flow, message) = apply(&mut page, command).await;
        if flow == Flow::Quit {
            break;
        }
        if let Some(message) = message {
            println!("{message}");
            if message == HELP {
                continue;
            }
        }
        println!("{}", page.render());
    }

    Ok(())
}

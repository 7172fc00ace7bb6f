use std::io;

use agm_scout::{
    cli::{prompt_query, Cli},
    configuration::get_configuration,
    startup::run,
};
use anyhow::Context;
use clap::Parser;
use env_logger::Env;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let mut configuration = get_configuration().context("Failed to read configuration.")?;
    cli.apply(&mut configuration);

    let query = match cli.query()? {
        Some(query) => query,
        None => prompt_query(&mut io::stdin().lock(), &mut io::stdout())?,
    };

    let summary = run(&configuration, &query).await?;

    if !summary.years_without_data.is_empty() {
        let years: Vec<String> = summary
            .years_without_data
            .iter()
            .map(|y| y.to_string())
            .collect();
        log::info!("Years without data: {}", years.join(", "));
    }

    match summary.output {
        Some(path) => println!(
            "成功抓取 {} 筆資料，已儲存至檔案: {}",
            summary.records,
            path.display()
        ),
        None => println!("查詢結束，未抓取到任何有效資料。"),
    }

    Ok(())
}

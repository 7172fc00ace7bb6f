use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
};

use clap::Parser;

use crate::{
    configuration::Settings,
    domain::{
        fiscal_year::{parse_years, YearSpecError},
        run_query::RunQuery,
    },
};

#[derive(Parser, Debug)]
#[command(
    name = "agm_scout",
    version,
    about = "Collects shareholder meeting disclosures from MOPS into a CSV file"
)]
pub struct Cli {
    /// Fiscal years (ROC calendar), e.g. `110`, `109、111,113` or `109~111`.
    /// Prompts interactively when omitted.
    #[arg(long)]
    pub years: Option<String>,

    /// Only query this company code.
    #[arg(long)]
    pub company: Option<String>,

    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Run the browser without a window.
    #[arg(long)]
    pub headless: bool,

    #[arg(long)]
    pub webdriver_url: Option<String>,
}

impl Cli {
    /// Lets command-line flags take precedence over loaded settings.
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(ref dir) = self.output_dir {
            settings.export.output_dir = dir.clone();
        }
        if let Some(ref url) = self.webdriver_url {
            settings.browser.webdriver_url = url.clone();
        }
        if self.headless {
            settings.browser.headless = true;
        }
    }

    /// Builds the run query from flags, or `None` when the years must be prompted for.
    pub fn query(&self) -> anyhow::Result<Option<RunQuery>> {
        let Some(ref spec) = self.years else {
            return Ok(None);
        };

        match RunQuery::parse(spec, self.company.as_deref())? {
            Some(query) => Ok(Some(query)),
            None => anyhow::bail!("'{}' contains no fiscal year of at least 100", spec),
        }
    }
}

/// Asks for a year specification until it yields at least one year, then for
/// an optional company code.
pub fn prompt_query<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> io::Result<RunQuery> {
    writeln!(output, "--- 股東會資料查詢設定 ---")?;
    writeln!(output, "請輸入查詢的民國年份(需>=100年)，支援以下格式：")?;
    writeln!(output, "1. 單一年份: 110")?;
    writeln!(output, "2. 不連續年份: 109、111、113 (全形、或半形逗號分隔)")?;
    writeln!(output, "3. 連續年份: 109~111")?;

    let (year_spec, years) = loop {
        let line = read_answer(input, output, "請輸入查詢年份: ")?;
        match parse_years(&line) {
            Ok(years) if years.is_empty() => {
                writeln!(output, "錯誤：未輸入有效年份或年份小於100，請重新輸入。")?;
            }
            Ok(years) => {
                let listed: Vec<String> = years.iter().map(|y| y.to_string()).collect();
                writeln!(output, "將會查詢以下年份: {}", listed.join(", "))?;
                break (line, years);
            }
            Err(YearSpecError::ReversedRange { start, end }) => {
                writeln!(output, "錯誤：年份範圍 {}~{} 起始年份大於結束年份。", start, end)?;
            }
            Err(YearSpecError::Format(token)) => {
                log::debug!("Rejected year token {:?}", token);
                writeln!(output, "錯誤：輸入格式不正確，請依照提示格式輸入。")?;
            }
        }
    };

    writeln!(output)?;
    writeln!(output, "Note: 可以指定單一公司，或抓取所有公司。")?;
    let company = read_answer(
        input,
        output,
        "請輸入公司代號 (如 2330)，或直接按 Enter 抓取全部: ",
    )?;

    Ok(RunQuery::new(&year_spec, years, Some(&company)))
}

fn read_answer<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    question: &str,
) -> io::Result<String> {
    write!(output, "{}", question)?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "input closed before an answer was given",
        ));
    }

    Ok(line.trim().to_string())
}

#[cfg(test)]
mod tests {
    use std::io::{Cursor, ErrorKind};

    use clap::Parser;

    use super::{prompt_query, Cli};

    fn prompt(answers: &str) -> (std::io::Result<crate::domain::run_query::RunQuery>, String) {
        let mut input = Cursor::new(answers.as_bytes().to_vec());
        let mut output = vec![];
        let result = prompt_query(&mut input, &mut output);
        (result, String::from_utf8(output).unwrap())
    }

    #[test]
    fn prompt_retries_until_years_are_valid() {
        let (query, output) = prompt("abc~1\n50~60\n111~109\n109~110\n2330\n");
        let query = query.unwrap();

        assert_eq!(query.year_spec, "109~110");
        assert_eq!(query.years.len(), 2);
        assert_eq!(query.company_code.as_deref(), Some("2330"));
        assert!(output.contains("輸入格式不正確"));
        assert!(output.contains("年份小於100"));
        assert!(output.contains("111~109"));
        assert!(output.contains("將會查詢以下年份: 109, 110"));
    }

    #[test]
    fn blank_company_queries_everything() {
        let (query, _) = prompt("110\n\n");

        assert_eq!(query.unwrap().company_code, None);
    }

    #[test]
    fn closed_input_is_an_error() {
        let (query, _) = prompt("50\n");

        assert_eq!(query.unwrap_err().kind(), ErrorKind::UnexpectedEof);
    }

    #[test]
    fn flags_build_a_query() {
        let cli = Cli::parse_from(["agm_scout", "--years", "110,112", "--company", "2330"]);
        let query = cli.query().unwrap().unwrap();

        assert_eq!(query.years.len(), 2);
        assert_eq!(query.company_code.as_deref(), Some("2330"));
    }

    #[test]
    fn flags_without_valid_years_fail() {
        let cli = Cli::parse_from(["agm_scout", "--years", "90"]);
        assert!(cli.query().is_err());

        let cli = Cli::parse_from(["agm_scout", "--years", "112~110"]);
        assert!(cli.query().is_err());
    }

    #[test]
    fn missing_years_flag_means_prompt() {
        let cli = Cli::parse_from(["agm_scout"]);
        assert!(cli.query().unwrap().is_none());
    }
}

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use itertools::Itertools;
use thiserror::Error;

use crate::{
    configuration::Settings,
    domain::{
        company_label::CompanyLabel,
        extractor::{company_codes, extract},
        fiscal_year::FiscalYear,
        meeting_record::{ShareholderMeetingRecord, MISSING_CELL},
        run_query::RunQuery,
    },
    services::{export_file_name, export_records, Droid, MeetingPortal, WebDriverPortal},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    PerYearQuery(FiscalYear, YearStage),
    Exporting,
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YearStage {
    NavigatingPage,
    SubmittingForm,
    AwaitingResults,
    Extracting,
    NoDataForYear,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("company filter {code} matched several companies in year {year}: {codes}")]
    AmbiguousCompanyFilter {
        code: String,
        year: FiscalYear,
        codes: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub years_queried: usize,
    pub years_without_data: Vec<FiscalYear>,
    pub records: usize,
    pub output: Option<PathBuf>,
}

/// Runs one query cycle per fiscal year against `portal` and exports what
/// was collected.
pub struct SessionDriver<'a, P> {
    portal: &'a mut P,
    query: &'a RunQuery,
    state: SessionState,
    records: Vec<ShareholderMeetingRecord>,
    company: CompanyLabel,
    years_without_data: Vec<FiscalYear>,
}

impl<'a, P: MeetingPortal> SessionDriver<'a, P> {
    pub fn new(portal: &'a mut P, query: &'a RunQuery) -> Self {
        SessionDriver {
            portal,
            query,
            state: SessionState::Idle,
            records: vec![],
            company: CompanyLabel::for_filter(query.company_code.as_deref()),
            years_without_data: vec![],
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn records(&self) -> &[ShareholderMeetingRecord] {
        &self.records
    }

    /// Queries every year in order. Ends in [`SessionState::Exporting`].
    pub async fn collect(&mut self) -> anyhow::Result<()> {
        let query = self.query;
        for &year in &query.years {
            log::info!("Querying shareholder meetings for year {}", year);
            self.query_year(year).await?;
        }

        self.transition(SessionState::Exporting);
        Ok(())
    }

    async fn query_year(&mut self, year: FiscalYear) -> anyhow::Result<()> {
        self.transition(SessionState::PerYearQuery(year, YearStage::NavigatingPage));
        self.portal.open_query_page().await?;

        self.transition(SessionState::PerYearQuery(year, YearStage::SubmittingForm));
        let query = self.query;
        let company_code = query.company_code.as_deref();
        self.portal.submit_query(year, company_code).await?;

        self.transition(SessionState::PerYearQuery(year, YearStage::AwaitingResults));
        let Some(rows) = self.portal.await_results().await? else {
            self.transition(SessionState::PerYearQuery(year, YearStage::NoDataForYear));
            log::warn!("No shareholder meeting data for year {}", year);
            self.years_without_data.push(year);
            return Ok(());
        };

        self.transition(SessionState::PerYearQuery(year, YearStage::Extracting));
        let records = extract(&rows, year);
        log::info!(
            "Year {}: {} rows rendered, {} records extracted",
            year,
            rows.len(),
            records.len()
        );

        if let Some(code) = company_code {
            let codes = company_codes(&records);
            if codes.len() > 1 {
                return Err(SessionError::AmbiguousCompanyFilter {
                    code: code.to_string(),
                    year,
                    codes: codes.iter().join(", "),
                }
                .into());
            }
            if let Some(name) = records
                .iter()
                .map(|r| r.company_name.as_str())
                .find(|name| *name != MISSING_CELL)
            {
                self.company.observe_name(name);
            }
        }

        self.records.extend(records);
        Ok(())
    }

    /// Writes the collected records and moves to [`SessionState::Done`].
    pub fn export(&mut self, output_dir: &Path, today: NaiveDate) -> anyhow::Result<RunSummary> {
        let output = match self.records.is_empty() {
            true => {
                log::info!("Query finished without any records, no file written");
                None
            }
            false => {
                let file_name = export_file_name(today, &self.query.year_spec, &self.company);
                let path = export_records(&self.records, output_dir, &file_name)?;
                if let Some(ref path) = path {
                    log::info!("Saved {} records to {}", self.records.len(), path.display());
                }
                path
            }
        };

        self.transition(SessionState::Done);

        Ok(RunSummary {
            years_queried: self.query.years.len(),
            years_without_data: self.years_without_data.clone(),
            records: self.records.len(),
            output,
        })
    }

    fn transition(&mut self, next: SessionState) {
        log::debug!("Session state {:?} -> {:?}", self.state, next);
        self.state = next;
    }
}

/// Opens a browser and runs the whole query against the portal page.
pub async fn run(settings: &Settings, query: &RunQuery) -> anyhow::Result<RunSummary> {
    log::info!("Starting browser session");
    let droid = Droid::new(&settings.browser).await?;
    let portal = WebDriverPortal::new(droid, &settings.portal);

    run_session(
        portal,
        query,
        &settings.export.output_dir,
        chrono::Local::now().date_naive(),
    )
    .await
}

/// Collects and exports through `portal`, closing it on every exit path.
pub async fn run_session<P: MeetingPortal>(
    mut portal: P,
    query: &RunQuery,
    output_dir: &Path,
    today: NaiveDate,
) -> anyhow::Result<RunSummary> {
    let outcome = {
        let mut session = SessionDriver::new(&mut portal, query);
        match session.collect().await {
            Ok(()) => session.export(output_dir, today),
            Err(e) => Err(e),
        }
    };

    log::info!("Closing browser session");
    if let Err(e) = portal.close().await {
        log::error!("{:?}", e);
    }

    outcome
}

use thirtyfour::prelude::*;

use super::Droid;
use crate::{
    configuration::PortalSettings,
    domain::{
        fiscal_year::FiscalYear,
        raw_row::{result_rows_xpath, rows_from_html, RawRow, RESULTS_CONTAINER_ID},
    },
};

const YEAR_INPUT_ID: &str = "YEAR";
const COMPANY_FROM_INPUT_ID: &str = "co_id1";
const COMPANY_TO_INPUT_ID: &str = "co_id2";
const SEARCH_BUTTON_XPATH: &str = "//input[@type='button' and @value=' 查詢 ']";

/// The page that answers shareholder-meeting queries.
///
/// One query cycle is `open_query_page`, `submit_query`, `await_results`.
/// `close` releases whatever session backs the portal.
#[allow(async_fn_in_trait)]
pub trait MeetingPortal {
    async fn open_query_page(&mut self) -> anyhow::Result<()>;

    async fn submit_query(
        &mut self,
        year: FiscalYear,
        company_code: Option<&str>,
    ) -> anyhow::Result<()>;

    /// `Ok(None)` when no results rendered within the bounded wait.
    async fn await_results(&mut self) -> anyhow::Result<Option<Vec<RawRow>>>;

    async fn close(self) -> anyhow::Result<()>;
}

pub struct WebDriverPortal<'a> {
    droid: Droid,
    settings: &'a PortalSettings,
}

impl<'a> WebDriverPortal<'a> {
    pub fn new(droid: Droid, settings: &'a PortalSettings) -> Self {
        WebDriverPortal { droid, settings }
    }

    fn driver(&self) -> &WebDriver {
        &self.droid.driver
    }
}

impl MeetingPortal for WebDriverPortal<'_> {
    async fn open_query_page(&mut self) -> anyhow::Result<()> {
        self.driver().goto(self.settings.query_url.as_str()).await?;
        Ok(())
    }

    async fn submit_query(
        &mut self,
        year: FiscalYear,
        company_code: Option<&str>,
    ) -> anyhow::Result<()> {
        let year_input = self
            .driver()
            .query(By::Id(YEAR_INPUT_ID))
            .wait(self.settings.results_timeout(), self.settings.poll_interval())
            .first()
            .await?;
        year_input.clear().await?;
        year_input.send_keys(year.to_string()).await?;

        if let Some(code) = company_code {
            // The portal filters on a code range, so both ends get the same code
            for id in [COMPANY_FROM_INPUT_ID, COMPANY_TO_INPUT_ID] {
                let input = self.driver().find(By::Id(id)).await?;
                input.clear().await?;
                input.send_keys(code).await?;
            }
        }

        self.driver()
            .find(By::XPath(SEARCH_BUTTON_XPATH))
            .await?
            .click()
            .await?;

        Ok(())
    }

    async fn await_results(&mut self) -> anyhow::Result<Option<Vec<RawRow>>> {
        let rendered = self
            .driver()
            .query(By::XPath(result_rows_xpath()))
            .wait(self.settings.results_timeout(), self.settings.poll_interval())
            .exists()
            .await?;

        if !rendered {
            return Ok(None);
        }

        let html = self
            .driver()
            .find(By::Id(RESULTS_CONTAINER_ID))
            .await?
            .outer_html()
            .await?;

        Ok(Some(rows_from_html(&html)))
    }

    async fn close(self) -> anyhow::Result<()> {
        self.droid.quit().await
    }
}

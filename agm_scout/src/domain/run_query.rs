use super::fiscal_year::{parse_years, FiscalYear, YearSpecError};

/// Validated input for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunQuery {
    /// The specification as typed, kept for naming the output file.
    pub year_spec: String,
    pub years: Vec<FiscalYear>,
    pub company_code: Option<String>,
}

impl RunQuery {
    pub fn new(year_spec: &str, years: Vec<FiscalYear>, company_code: Option<&str>) -> Self {
        let company_code = company_code
            .map(str::trim)
            .filter(|code| !code.is_empty())
            .map(str::to_string);

        RunQuery {
            year_spec: year_spec.trim().to_string(),
            years,
            company_code,
        }
    }

    /// Parses `year_spec`, returning `Ok(None)` when it names no queryable year.
    pub fn parse(
        year_spec: &str,
        company_code: Option<&str>,
    ) -> Result<Option<Self>, YearSpecError> {
        let years = parse_years(year_spec)?;
        match years.is_empty() {
            true => Ok(None),
            false => Ok(Some(RunQuery::new(year_spec, years, company_code))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::RunQuery;

    #[test]
    fn blank_company_means_all_companies() {
        let query = RunQuery::parse("110", Some("   ")).unwrap().unwrap();
        assert_eq!(query.company_code, None);

        let query = RunQuery::parse("110", Some(" 2330 ")).unwrap().unwrap();
        assert_eq!(query.company_code.as_deref(), Some("2330"));
    }

    #[test]
    fn spec_without_valid_years_is_none() {
        assert_eq!(RunQuery::parse("50~60", None), Ok(None));
    }
}

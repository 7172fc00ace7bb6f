/// File-name label for the companies covered by a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompanyLabel {
    AllCompanies,
    Company { code: String, name: Option<String> },
}

impl CompanyLabel {
    pub fn for_filter(company_code: Option<&str>) -> Self {
        match company_code {
            Some(code) => CompanyLabel::Company {
                code: code.to_string(),
                name: None,
            },
            None => CompanyLabel::AllCompanies,
        }
    }

    /// Records the company name the first time a non-empty one is seen.
    pub fn observe_name(&mut self, candidate: &str) {
        if let CompanyLabel::Company { name: name @ None, .. } = self {
            let candidate = candidate.trim();
            if !candidate.is_empty() {
                *name = Some(candidate.to_string());
            }
        }
    }

    pub fn file_label(&self) -> String {
        match self {
            CompanyLabel::AllCompanies => "全部公司資料".to_string(),
            CompanyLabel::Company {
                code,
                name: Some(name),
            } => format!("{}{}資料", code, name),
            CompanyLabel::Company { code, name: None } => format!("{}資料", code),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::CompanyLabel;

    #[test]
    fn name_is_set_only_once() {
        let mut label = CompanyLabel::for_filter(Some("2330"));
        label.observe_name("  ");
        label.observe_name("台積電");
        label.observe_name("其他");

        assert_eq!(label.file_label(), "2330台積電資料");
    }

    #[test]
    fn unfiltered_run_ignores_names() {
        let mut label = CompanyLabel::for_filter(None);
        label.observe_name("台積電");

        assert_eq!(label, CompanyLabel::AllCompanies);
        assert_eq!(label.file_label(), "全部公司資料");
    }

    #[test]
    fn code_only_label_without_name() {
        assert_eq!(
            CompanyLabel::for_filter(Some("1101")).file_label(),
            "1101資料"
        );
    }
}

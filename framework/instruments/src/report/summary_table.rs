use tabled::Tabled;

#[derive(Tabled)]
pub struct SummaryRow {
    #[tabled(rename = "Metric")]
    pub metric: &'static str,
    #[tabled(rename = "Value")]
    pub value: String,
}

impl SummaryRow {
    pub fn new(metric: &'static str, value: String) -> Self {
        Self { metric, value }
    }
}

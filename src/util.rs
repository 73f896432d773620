pub fn mean(data: &[f64]) -> Option<f64> {
    match data.len() {
        0 => None,
        count => Some(data.iter().sum::<f64>() / count as f64),
    }
}

pub fn std_dev(data: &[f64]) -> Option<f64> {
    let data_mean = mean(data)?;
    let variance = data
        .iter()
        .map(|value| {
            let diff = data_mean - *value;

            diff * diff
        })
        .sum::<f64>()
        / data.len() as f64;

    Some(variance.sqrt())
}

/// Whole milliseconds, e.g. "243ms"
pub fn format_ms(ms: f64) -> String {
    format!("{}ms", ms.round())
}

/// Like [`format_ms`] but renders missing data as "-"
pub fn format_opt_ms(ms: Option<f64>) -> String {
    ms.map(format_ms).unwrap_or_else(|| "-".to_string())
}

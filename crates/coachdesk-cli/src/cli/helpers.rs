use anyhow::{bail, Context};
use coachdesk_client::services::exercises::ExerciseStep;
use coachdesk_client::services::meal_demos::Ingredient;
use coachdesk_client::{Envelope, PageParams};
use coachdesk_query::{QueryResult, QueryStatus};
use serde::Serialize;

use super::args::PageArgs;
use crate::exit_codes::{REQUEST_FAILED, SUCCESS};

impl From<&PageArgs> for PageParams {
    fn from(args: &PageArgs) -> Self {
        PageParams {
            page_index: args.page,
            page_size: args.size,
        }
    }
}

/// `title` or `title:description`, numbered from 1 in argument order.
pub fn parse_steps(raw: &[String]) -> anyhow::Result<Vec<ExerciseStep>> {
    raw.iter()
        .enumerate()
        .map(|(i, s)| {
            let (title, description) = match s.split_once(':') {
                Some((title, description)) => (title.trim(), Some(description.trim())),
                None => (s.trim(), None),
            };
            if title.is_empty() {
                bail!("step {} has no title", i + 1);
            }
            Ok(ExerciseStep {
                order: (i + 1) as u32,
                title: title.to_string(),
                description: description.filter(|d| !d.is_empty()).map(String::from),
            })
        })
        .collect()
}

/// `name:quantity:unit`.
pub fn parse_ingredient(raw: &str) -> anyhow::Result<Ingredient> {
    let mut fields = raw.splitn(3, ':').map(str::trim);
    let (Some(name), Some(quantity), Some(unit)) = (fields.next(), fields.next(), fields.next())
    else {
        bail!("ingredient '{}' must look like name:quantity:unit", raw);
    };
    if name.is_empty() {
        bail!("ingredient '{}' has no name", raw);
    }
    let quantity: f64 = quantity
        .parse()
        .with_context(|| format!("ingredient '{}' has an invalid quantity", raw))?;
    Ok(Ingredient {
        name: name.to_string(),
        quantity,
        unit: unit.to_string(),
    })
}

/// Result printer for text or JSON mode.
#[derive(Debug, Clone, Copy)]
pub struct Output {
    pub json: bool,
}

impl Output {
    /// Print an envelope and map it to an exit code.
    pub fn envelope<T: Serialize>(&self, envelope: &Envelope<T>) -> anyhow::Result<i32> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(envelope)?);
        } else if envelope.success {
            if let Some(data) = &envelope.data {
                println!("{}", serde_json::to_string_pretty(data)?);
            }
            eprintln!("{}", envelope.message);
        } else {
            eprintln!("error: {}", envelope.message);
        }
        Ok(if envelope.success {
            SUCCESS
        } else {
            REQUEST_FAILED
        })
    }

    pub fn query<T: Serialize>(&self, result: QueryResult<T>) -> anyhow::Result<i32> {
        self.envelope(&query_envelope(result))
    }
}

fn query_envelope<T>(result: QueryResult<T>) -> Envelope<T> {
    match (result.status, result.data) {
        (QueryStatus::Success, Some(data)) => {
            Envelope::ok(data, coachdesk_client::DEFAULT_SUCCESS_MESSAGE)
        }
        (QueryStatus::Disabled, _) => Envelope::failure("query is disabled"),
        _ => Envelope::failure(result.error.unwrap_or_default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_steps() {
        let steps = parse_steps(&["Hold the bell".into(), "Sit back: knees out".into()]).unwrap();
        assert_eq!(steps[0].order, 1);
        assert_eq!(steps[0].description, None);
        assert_eq!(steps[1].order, 2);
        assert_eq!(steps[1].title, "Sit back");
        assert_eq!(steps[1].description.as_deref(), Some("knees out"));

        assert!(parse_steps(&[":no title".into()]).is_err());
    }

    #[test]
    fn test_parse_ingredient() {
        let oats = parse_ingredient("oats:80:g").unwrap();
        assert_eq!(oats.name, "oats");
        assert_eq!(oats.quantity, 80.0);
        assert_eq!(oats.unit, "g");

        assert!(parse_ingredient("oats:80").is_err());
        assert!(parse_ingredient("oats:lots:g").is_err());
    }

    #[test]
    fn test_query_envelope_mapping() {
        let disabled = query_envelope::<u32>(QueryResult::disabled());
        assert!(!disabled.success);

        let failed = query_envelope(QueryResult::<u32> {
            status: QueryStatus::Error,
            data: Some(1),
            error: Some("Request failed with status code 500".to_string()),
            from_cache: false,
        });
        assert!(!failed.success);
        assert!(failed.data.is_none());
        assert_eq!(failed.message, "Request failed with status code 500");
    }
}

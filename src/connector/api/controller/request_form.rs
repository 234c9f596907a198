use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};

use crate::cli::RequestArgs;
use crate::domain::{DomainError, TravelRequest, TravelRequestDraft};

/// Assemble a draft from `--request` (if given) and then overlay any flags.
pub fn build_draft(args: &RequestArgs) -> Result<TravelRequestDraft> {
    let mut draft = match &args.request {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .map_err(DomainError::from)
                .with_context(|| format!("failed to read request file {}", path.display()))?;
            serde_json::from_str::<TravelRequestDraft>(&raw)
                .with_context(|| format!("invalid request file {}", path.display()))?
        }
        None => TravelRequestDraft::default(),
    };

    if let Some(origin) = &args.origin {
        draft.origin = origin.clone();
    }
    if let Some(destination) = &args.destination {
        draft.destination = destination.clone();
    }
    if args.start.is_some() {
        draft.start_date = args.start;
    }
    if args.end.is_some() {
        draft.end_date = args.end;
    }
    if args.budget.is_some() {
        draft.budget = args.budget;
    }
    if let Some(travelers) = args.travelers {
        draft.travelers = travelers;
    }
    if !args.interests.is_empty() {
        draft.interests = args.interests.clone();
    }
    if args.currency.is_some() {
        draft.currency = args.currency.clone();
    }

    Ok(draft)
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Build, validate, and freeze the request described by `args`.
pub fn submit_request(args: &RequestArgs, today: NaiveDate) -> Result<TravelRequest> {
    let draft = build_draft(args)?;
    Ok(draft.submit(today)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_fill_an_empty_draft() {
        let args = RequestArgs {
            origin: Some("Pune".into()),
            destination: Some("Goa".into()),
            budget: Some(20_000.0),
            interests: vec!["Beach".into()],
            ..RequestArgs::default()
        };

        let draft = build_draft(&args).unwrap();
        assert_eq!(draft.origin, "Pune");
        assert_eq!(draft.destination, "Goa");
        assert_eq!(draft.budget, Some(20_000.0));
        assert_eq!(draft.travelers, 2);
        assert_eq!(draft.interests, vec!["Beach".to_string()]);
    }

    #[test]
    fn missing_request_file_is_reported() {
        let args = RequestArgs {
            request: Some("/definitely/not/here.json".into()),
            ..RequestArgs::default()
        };
        let err = build_draft(&args).unwrap_err();
        assert!(err.to_string().contains("failed to read request file"));
        let cause = err.downcast_ref::<DomainError>().unwrap();
        assert!(matches!(cause, DomainError::IoError(_)));
        assert!(format!("{err:#}").contains("I/O error:"));
    }

    #[test]
    fn validation_errors_surface() {
        let err = submit_request(&RequestArgs::default(), today()).unwrap_err();
        assert!(err.to_string().starts_with("Validation failed:"));
    }
}

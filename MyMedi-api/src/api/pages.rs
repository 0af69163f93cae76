use askama::Template;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{debug, error, instrument, warn};

use my_medi_domain::entities::city::{CityProfile, CitySummary};
use my_medi_domain::entities::pregnancy::{PregnancyReport, PregnancyRequest};
use my_medi_domain::error::ServiceError;

use crate::api::state::AppState;

/// Template wrapper that converts Askama templates into HTML responses.
struct HtmlTemplate<T>(T);

impl<T> IntoResponse for HtmlTemplate<T>
where
    T: Template,
{
    fn into_response(self) -> Response {
        match self.0.render() {
            Ok(html) => Html(html).into_response(),
            Err(err) => {
                error!("Failed to render template: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Failed to render template: {err}"),
                )
                    .into_response()
            }
        }
    }
}

#[derive(Template)]
#[template(path = "index.html")]
struct HomeTemplate {
    ai_enabled: bool,
}

#[derive(Template)]
#[template(path = "pregnancy.html")]
struct PregnancyTemplate {
    week: String,
    last_period_date: String,
    report: Option<PregnancyReport>,
    error: Option<String>,
}

#[derive(Template)]
#[template(path = "reports.html")]
struct ReportsTemplate {
    max_upload_mb: usize,
}

/// Directory row with whether a detail page exists
struct CityListing {
    city: &'static CitySummary,
    has_profile: bool,
}

#[derive(Template)]
#[template(path = "cities.html")]
struct CitiesTemplate {
    cities: Vec<CityListing>,
}

#[derive(Template)]
#[template(path = "city.html")]
struct CityTemplate {
    city: &'static CityProfile,
}

#[derive(Template)]
#[template(path = "privacy.html")]
struct PrivacyTemplate;

#[derive(Template)]
#[template(path = "terms.html")]
struct TermsTemplate;

#[derive(Template)]
#[template(path = "about.html")]
struct AboutTemplate;

#[derive(Template)]
#[template(path = "not_found.html")]
struct NotFoundTemplate {
    path: String,
}

/// Query string of the pregnancy form; empty inputs arrive as empty strings
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PregnancyQuery {
    pub week: String,
    pub last_period_date: String,
    pub symptoms: String,
}

impl PregnancyQuery {
    fn is_blank(&self) -> bool {
        self.week.trim().is_empty() && self.last_period_date.trim().is_empty()
    }

    fn to_request(&self) -> Result<PregnancyRequest, String> {
        let week = match self.week.trim() {
            "" => None,
            w => Some(w.parse::<u32>().map_err(|_| "Pregnancy week must be a whole number".to_string())?),
        };
        let last_period_date = match self.last_period_date.trim() {
            "" => None,
            d => Some(
                NaiveDate::parse_from_str(d, "%Y-%m-%d")
                    .map_err(|_| "Last period date must be a valid date".to_string())?,
            ),
        };
        let symptoms = Some(self.symptoms.trim().to_string()).filter(|s| !s.is_empty());

        Ok(PregnancyRequest { week, last_period_date, symptoms })
    }
}

/// Home page (GET /)
pub async fn home(State(state): State<AppState>) -> impl IntoResponse {
    HtmlTemplate(HomeTemplate { ai_enabled: state.config.ai_enabled() })
}

/// Pregnancy tracker (GET /pregnancy), rendering the report once the form is submitted
#[instrument(skip(state))]
pub async fn pregnancy(State(state): State<AppState>, Query(query): Query<PregnancyQuery>) -> impl IntoResponse {
    let (report, error) = if query.is_blank() {
        (None, None)
    } else {
        match query.to_request() {
            Ok(request) => match state.pregnancy.report(&request) {
                Ok(report) => (Some(report), None),
                Err(ServiceError::Validation(message)) => {
                    warn!("Pregnancy form rejected: {}", message);
                    (None, Some(message))
                }
                Err(e) => {
                    error!("Pregnancy report failed: {}", e);
                    (None, Some("The report could not be prepared. Please try again.".to_string()))
                }
            },
            Err(message) => (None, Some(message)),
        }
    };

    HtmlTemplate(PregnancyTemplate {
        week: query.week,
        last_period_date: query.last_period_date,
        report,
        error,
    })
}

/// Report reader (GET /reports)
pub async fn reports() -> impl IntoResponse {
    HtmlTemplate(ReportsTemplate {
        max_upload_mb: my_medi_domain::services::report_reader::MAX_UPLOAD_BYTES / (1024 * 1024),
    })
}

/// City directory (GET /city)
pub async fn cities(State(state): State<AppState>) -> impl IntoResponse {
    let cities = state
        .cities
        .directory()
        .iter()
        .map(|city| CityListing { city, has_profile: state.cities.has_profile(city.slug) })
        .collect();
    HtmlTemplate(CitiesTemplate { cities })
}

/// City healthcare profile (GET /city/:slug)
#[instrument(skip(state))]
pub async fn city(State(state): State<AppState>, Path(slug): Path<String>) -> Response {
    match state.cities.profile(&slug) {
        Ok(city) => HtmlTemplate(CityTemplate { city }).into_response(),
        Err(e) => {
            debug!("{}", e);
            not_found_page(format!("/city/{}", slug))
        }
    }
}

pub async fn privacy() -> impl IntoResponse {
    HtmlTemplate(PrivacyTemplate)
}

pub async fn terms() -> impl IntoResponse {
    HtmlTemplate(TermsTemplate)
}

pub async fn about() -> impl IntoResponse {
    HtmlTemplate(AboutTemplate)
}

fn not_found_page(path: String) -> Response {
    (StatusCode::NOT_FOUND, HtmlTemplate(NotFoundTemplate { path })).into_response()
}

/// Fallback for unknown routes
pub async fn not_found(uri: axum::http::Uri) -> Response {
    debug!(path = %uri.path(), "No route matched");
    not_found_page(uri.path().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_pregnancy_query_renders_empty_form() {
        assert!(PregnancyQuery::default().is_blank());
    }

    #[test]
    fn test_pregnancy_query_parses_form_values() {
        let query = PregnancyQuery {
            week: " 20 ".to_string(),
            last_period_date: String::new(),
            symptoms: "back pain".to_string(),
        };
        let request = query.to_request().unwrap();
        assert_eq!(request.week, Some(20));
        assert_eq!(request.last_period_date, None);
        assert_eq!(request.symptoms.as_deref(), Some("back pain"));
    }

    #[test]
    fn test_pregnancy_query_rejects_bad_date() {
        let query = PregnancyQuery {
            last_period_date: "12/01/2026".to_string(),
            ..Default::default()
        };
        assert!(query.to_request().is_err());
    }
}

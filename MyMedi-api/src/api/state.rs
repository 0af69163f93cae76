use std::sync::Arc;

use tracing::{error, info, warn};

use my_medi_domain::clients::generation::{OpenAiClient, TextGenerator};
use my_medi_domain::config::AppConfig;
use my_medi_domain::health::{HealthService, HealthServiceTrait};
use my_medi_domain::services::location::LocationService;
use my_medi_domain::services::{
    create_default_accuracy_service, create_default_assistant_service, create_default_city_service,
    create_default_feedback_service, create_default_form_helper_service, create_default_live_analysis_service,
    create_default_location_service, create_default_medication_analyzer_service, create_default_pregnancy_service,
    create_default_report_reader_service, create_default_safety_monitor_service,
    create_default_symptom_analyzer_service, create_default_weight_plan_service, AccuracyServiceTrait,
    AssistantServiceTrait, CityServiceTrait, FeedbackServiceTrait, FormHelperServiceTrait, LiveAnalysisServiceTrait,
    LocationServiceTrait, MedicationAnalyzerServiceTrait, PregnancyServiceTrait, ReportReaderServiceTrait,
    SafetyMonitorServiceTrait, SymptomAnalyzerServiceTrait, WeightPlanServiceTrait,
};

pub type HealthServiceRef = Arc<dyn HealthServiceTrait + Send + Sync>;

/// Services shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub health: HealthServiceRef,
    pub live_analysis: Arc<dyn LiveAnalysisServiceTrait + Send + Sync>,
    pub safety_monitor: Arc<dyn SafetyMonitorServiceTrait + Send + Sync>,
    pub form_helper: Arc<dyn FormHelperServiceTrait + Send + Sync>,
    pub feedback: Arc<dyn FeedbackServiceTrait + Send + Sync>,
    pub accuracy: Arc<dyn AccuracyServiceTrait + Send + Sync>,
    pub location: Arc<dyn LocationServiceTrait + Send + Sync>,
    pub assistant: Arc<dyn AssistantServiceTrait + Send + Sync>,
    pub symptom_analyzer: Arc<dyn SymptomAnalyzerServiceTrait + Send + Sync>,
    pub medication_analyzer: Arc<dyn MedicationAnalyzerServiceTrait + Send + Sync>,
    pub report_reader: Arc<dyn ReportReaderServiceTrait + Send + Sync>,
    pub weight_plan: Arc<dyn WeightPlanServiceTrait + Send + Sync>,
    pub pregnancy: Arc<dyn PregnancyServiceTrait + Send + Sync>,
    pub cities: Arc<dyn CityServiceTrait + Send + Sync>,
}

impl AppState {
    /// Build every service from configuration, creating the outbound clients the keys allow
    pub fn from_config(config: AppConfig) -> Self {
        let generator = text_generator(&config);

        let location: Arc<dyn LocationServiceTrait + Send + Sync> = match create_default_location_service(&config) {
            Ok(service) => Arc::new(service),
            Err(e) => {
                error!("Failed to create maps client: {}. Location lookups are disabled.", e);
                Arc::new(LocationService::disabled())
            }
        };

        Self::with_generator(config, generator).with_location_service(location)
    }

    /// Build the services around an explicit text generator, with maps disabled
    pub fn with_generator(config: AppConfig, generator: Option<Arc<dyn TextGenerator>>) -> Self {
        let health = Arc::new(HealthService::from_config(&config));
        let report_reader = create_default_report_reader_service(generator.clone(), &config.ocr_model);

        Self {
            health,
            live_analysis: Arc::new(create_default_live_analysis_service()),
            safety_monitor: Arc::new(create_default_safety_monitor_service()),
            form_helper: Arc::new(create_default_form_helper_service()),
            feedback: Arc::new(create_default_feedback_service()),
            accuracy: Arc::new(create_default_accuracy_service()),
            location: Arc::new(LocationService::disabled()),
            assistant: Arc::new(create_default_assistant_service(generator.clone())),
            symptom_analyzer: Arc::new(create_default_symptom_analyzer_service(generator.clone())),
            medication_analyzer: Arc::new(create_default_medication_analyzer_service(generator)),
            report_reader: Arc::new(report_reader),
            weight_plan: Arc::new(create_default_weight_plan_service()),
            pregnancy: Arc::new(create_default_pregnancy_service()),
            cities: Arc::new(create_default_city_service()),
            config: Arc::new(config),
        }
    }

    pub fn with_location_service(mut self, location: Arc<dyn LocationServiceTrait + Send + Sync>) -> Self {
        self.location = location;
        self
    }

    pub fn with_health_service(mut self, health: HealthServiceRef) -> Self {
        self.health = health;
        self
    }
}

/// Chat-completions client when a usable key is configured
fn text_generator(config: &AppConfig) -> Option<Arc<dyn TextGenerator>> {
    let Some(key) = config.openai_api_key.clone() else {
        warn!("No OpenAI key configured, AI endpoints will answer with stub data or errors");
        return None;
    };

    match OpenAiClient::new(key, &config.openai_base_url, &config.openai_model) {
        Ok(client) => {
            info!(model = %config.openai_model, "Text generation client ready");
            Some(Arc::new(client))
        }
        Err(e) => {
            error!("Failed to create text generation client: {}", e);
            None
        }
    }
}

//! Prompt text for each advisor feature.
//!
//! Every prompt names the reply language with [`Language::prompt_name`].

use serde::Deserialize;
use serde_json::{Value, json};
use sheti_core::Language;

use crate::services::weather::CurrentConditions;

/// Characters of advice read aloud.
pub const SPEECH_MAX_CHARS: usize = 800;
const SPEECH_PREFIX: &str = "Read this advice clearly for a farmer: ";

/// Soil and crop details for a fertilizer recommendation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FertilizerForm {
    pub crop_name: String,
    #[serde(rename = "soilPH")]
    pub soil_ph: String,
    pub soil_moisture: String,
    pub climate: String,
    pub nitrogen: String,
    pub phosphorus: String,
    pub potassium: String,
}

impl FertilizerForm {
    /// Name of the first empty field, if any.
    #[must_use]
    pub fn missing_field(&self) -> Option<&'static str> {
        [
            ("cropName", &self.crop_name),
            ("soilPH", &self.soil_ph),
            ("soilMoisture", &self.soil_moisture),
            ("climate", &self.climate),
            ("nitrogen", &self.nitrogen),
            ("phosphorus", &self.phosphorus),
            ("potassium", &self.potassium),
        ]
        .into_iter()
        .find(|(_, v)| v.trim().is_empty())
        .map(|(name, _)| name)
    }
}

/// Inputs for the dosage calculator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculatorForm {
    pub land_size: String,
    pub crop_type: String,
    pub fertilizer_type: String,
}

impl CalculatorForm {
    /// Name of the first empty field, if any.
    #[must_use]
    pub fn missing_field(&self) -> Option<&'static str> {
        [
            ("landSize", &self.land_size),
            ("cropType", &self.crop_type),
            ("fertilizerType", &self.fertilizer_type),
        ]
        .into_iter()
        .find(|(_, v)| v.trim().is_empty())
        .map(|(name, _)| name)
    }
}

#[must_use]
pub fn fertilizer(form: &FertilizerForm, lang: Language) -> String {
    format!(
        "Act as an expert agronomist specializing in organic farming in India.\n\
         Recommend the best organic fertilizers for:\n\
         - Crop: {}\n\
         - Soil pH: {}\n\
         - Soil Moisture: {}%\n\
         - Climate: {}\n\
         - Soil NPK Levels: N:{}, P:{}, K:{}\n\n\
         Provide detailed application instructions, dosage, and timing in {}. \
         Use Markdown formatting with clear headings. \
         Use Google Search to ensure up-to-date regional practices.",
        form.crop_name.trim(),
        form.soil_ph.trim(),
        form.soil_moisture.trim(),
        form.climate.trim(),
        form.nitrogen.trim(),
        form.phosphorus.trim(),
        form.potassium.trim(),
        lang.prompt_name(),
    )
}

#[must_use]
pub fn crop_doctor(notes: Option<&str>, lang: Language) -> String {
    let notes = notes.map(str::trim).filter(|n| !n.is_empty()).unwrap_or("None");
    format!(
        "You are a professional plant pathologist. Identify the plant and any visible \
         diseases, pests, or nutrient deficiencies from this image.\n\
         Recommend specific organic treatments, soil improvements, and preventive measures \
         suitable for small-scale farmers.\n\
         Reply in {}. Use Markdown. Additional user notes: {notes}",
        lang.prompt_name(),
    )
}

#[must_use]
pub fn calculator(form: &CalculatorForm, lang: Language) -> String {
    format!(
        "Act as a farm management consultant.\n\
         Calculate the exact amount of {} required for {} acres of {}.\n\
         Include application frequency and seasonal advice.\n\
         Reply in {}. Use Markdown with calculation steps shown clearly.",
        form.fertilizer_type.trim(),
        form.land_size.trim(),
        form.crop_type.trim(),
        lang.prompt_name(),
    )
}

/// Ask for localized wording of measured weather.
#[must_use]
pub fn weather(conditions: &CurrentConditions, lang: Language) -> String {
    format!(
        "Current weather at Latitude {}, Longitude {}:\n\
         - Temperature: {:.1} °C\n\
         - Sky condition: {}\n\
         - Wind: {:.1} km/h from the {}\n\
         - Humidity: {}%\n\n\
         Describe the sky condition in a few words, name the nearest town or district \
         for these coordinates as the location, and provide a brief agricultural tip \
         based on these conditions for an organic farmer.\n\
         Reply in {}.",
        conditions.latitude,
        conditions.longitude,
        conditions.temperature,
        conditions.description,
        conditions.wind_speed,
        conditions.wind_direction,
        conditions.humidity,
        lang.prompt_name(),
    )
}

/// Schema for [`weather`] answers.
#[must_use]
pub fn weather_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "condition": { "type": "STRING" },
            "recommendation": { "type": "STRING" },
            "location": { "type": "STRING" }
        },
        "required": ["condition", "recommendation", "location"]
    })
}

/// System instruction for the chatbot.
#[must_use]
pub fn chat_system(lang: Language) -> String {
    format!(
        "You are 'Sheti Man AI', an expert assistant for Indian farmers.\n\
         You specialize in organic and sustainable farming.\n\
         Always provide practical, cost-effective, and environmentally friendly solutions.\n\
         If asked about modern tools or trends, use search to find latest facts.\n\
         Reply in {}. Use Markdown.",
        lang.prompt_name(),
    )
}

/// Text sent to the speech model, cut to [`SPEECH_MAX_CHARS`].
#[must_use]
pub fn speech(text: &str) -> String {
    let clipped: String = text.chars().take(SPEECH_MAX_CHARS).collect();
    format!("{SPEECH_PREFIX}{clipped}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> FertilizerForm {
        FertilizerForm {
            crop_name: "Tomato".to_owned(),
            soil_ph: "6.5".to_owned(),
            soil_moisture: "40".to_owned(),
            climate: "Semi-arid".to_owned(),
            nitrogen: "Low".to_owned(),
            phosphorus: "Medium".to_owned(),
            potassium: "High".to_owned(),
        }
    }

    #[test]
    fn test_fertilizer_prompt_fields() {
        let prompt = fertilizer(&form(), Language::Hi);
        assert!(prompt.contains("- Crop: Tomato"));
        assert!(prompt.contains("- Soil Moisture: 40%"));
        assert!(prompt.contains("N:Low, P:Medium, K:High"));
        assert!(prompt.contains("timing in Hindi."));
    }

    #[test]
    fn test_form_field_names() {
        let parsed: FertilizerForm = serde_json::from_str(
            r#"{"cropName":"Rice","soilPH":"7","soilMoisture":"55","climate":"Humid",
                "nitrogen":"10","phosphorus":"20","potassium":""}"#,
        )
        .unwrap_or_default();
        assert_eq!(parsed.soil_ph, "7");
        assert_eq!(parsed.missing_field(), Some("potassium"));
        assert_eq!(form().missing_field(), None);
    }

    #[test]
    fn test_crop_doctor_notes_default() {
        assert!(crop_doctor(None, Language::Mr).ends_with("Additional user notes: None"));
        assert!(crop_doctor(Some("  "), Language::Mr).ends_with("notes: None"));
        assert!(crop_doctor(Some("yellow leaves"), Language::En).contains("Reply in English."));
    }

    #[test]
    fn test_calculator_prompt() {
        let prompt = calculator(
            &CalculatorForm {
                land_size: "2.5".to_owned(),
                crop_type: "Wheat".to_owned(),
                fertilizer_type: "Vermicompost".to_owned(),
            },
            Language::Mr,
        );
        assert!(prompt.contains("exact amount of Vermicompost required for 2.5 acres of Wheat."));
        assert!(prompt.contains("Reply in Marathi."));
    }

    #[test]
    fn test_chat_system_names_language() {
        assert!(chat_system(Language::Hi).contains("Reply in Hindi. Use Markdown."));
    }

    #[test]
    fn test_speech_prompt_truncates_by_chars() {
        let long = "क".repeat(1000);
        let prompt = speech(&long);
        assert!(prompt.starts_with(SPEECH_PREFIX));
        assert_eq!(
            prompt.chars().count(),
            SPEECH_PREFIX.chars().count() + SPEECH_MAX_CHARS
        );
        assert_eq!(speech("short"), format!("{SPEECH_PREFIX}short"));
    }
}

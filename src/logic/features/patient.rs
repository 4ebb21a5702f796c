//! Patient measurements as received from the client.
//!
//! Ranges are enforced with `validator` before any artifact is touched.

use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;
use validator::{Validate, ValidationError, ValidationErrors};

use super::vector::{Feature, FeatureVector, FEATURE_COUNT};

/// Clinical input for one risk assessment
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PatientData {
    /// Glycated hemoglobin, 3-month glucose average. Normal range 4-5.6%.
    #[validate(range(min = 0.0, max = 20.0))]
    pub hba1c: f64,

    /// Glucose 2 hours after eating (mg/dL)
    #[validate(range(min = 0, max = 500))]
    #[serde(deserialize_with = "integral")]
    pub glucose_postprandial: i32,

    /// Fasting glucose (mg/dL)
    #[validate(range(min = 0, max = 500))]
    #[serde(deserialize_with = "integral")]
    pub glucose_fasting: i32,

    /// Patient age in years
    #[validate(range(min = 0, max = 120))]
    #[serde(deserialize_with = "integral")]
    pub age: i32,

    /// Body mass index (weight / height²)
    #[validate(range(min = 10.0, max = 60.0))]
    pub bmi: f64,

    /// Systolic blood pressure (mm Hg)
    #[validate(range(min = 50, max = 250))]
    #[serde(deserialize_with = "integral")]
    pub systolic_bp: i32,

    /// Total cholesterol (mg/dL)
    #[validate(range(min = 50, max = 500))]
    #[serde(deserialize_with = "integral")]
    pub cholesterol_total: i32,

    /// Exercise minutes per week
    #[validate(range(min = 0, max = 10080))]
    #[serde(deserialize_with = "integral")]
    pub physical_activity_minutes_per_week: i32,
}

impl PatientData {
    /// Decode a JSON body, reporting every absent or mistyped field at once.
    ///
    /// Ranges are not checked here; see [`Validate`].
    pub fn from_json(body: Value) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        match body.as_object() {
            Some(fields) => {
                for feature in Feature::ALL {
                    let problem = match fields.get(feature.name()) {
                        None | Some(Value::Null) => Some(("required", "field required")),
                        Some(value) => type_problem(feature, value),
                    };
                    if let Some((code, message)) = problem {
                        errors.add(feature.name(), field_error(code, message.to_string()));
                    }
                }
            }
            None => errors.add("body", field_error("type", "body must be a JSON object".to_string())),
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        serde_json::from_value(body).map_err(|e| {
            let mut errors = ValidationErrors::new();
            errors.add("body", field_error("type", e.to_string()));
            errors
        })
    }
}

fn type_problem(feature: Feature, value: &Value) -> Option<(&'static str, &'static str)> {
    match value.as_f64() {
        None => Some(("type", "value is not a valid number")),
        Some(v) if feature.is_integer() && as_i32(v).is_none() => {
            Some(("type", "value is not a valid integer"))
        }
        Some(_) => None,
    }
}

fn field_error(code: &'static str, message: String) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    error
}

/// Whole number inside the i32 range; `40` and `40.0` are both accepted
fn as_i32(value: f64) -> Option<i32> {
    let in_range = value >= f64::from(i32::MIN) && value <= f64::from(i32::MAX);
    (value.fract() == 0.0 && in_range).then(|| value as i32)
}

fn integral<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    as_i32(value).ok_or_else(|| de::Error::custom(format!("expected an integer, got {}", value)))
}

impl From<&PatientData> for FeatureVector {
    fn from(p: &PatientData) -> Self {
        let values: [f64; FEATURE_COUNT] = [
            p.hba1c,
            f64::from(p.glucose_postprandial),
            f64::from(p.glucose_fasting),
            f64::from(p.age),
            p.bmi,
            f64::from(p.systolic_bp),
            f64::from(p.cholesterol_total),
            f64::from(p.physical_activity_minutes_per_week),
        ];
        FeatureVector::from_values(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> PatientData {
        PatientData {
            hba1c: 5.5,
            glucose_postprandial: 140,
            glucose_fasting: 90,
            age: 35,
            bmi: 24.5,
            systolic_bp: 120,
            cholesterol_total: 180,
            physical_activity_minutes_per_week: 150,
        }
    }

    #[test]
    fn test_sample_is_valid() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn test_range_bounds_are_inclusive() {
        let mut p = sample();
        p.hba1c = 20.0;
        p.bmi = 10.0;
        p.physical_activity_minutes_per_week = 10080;
        p.systolic_bp = 50;
        assert!(p.validate().is_ok());
    }

    #[test]
    fn test_out_of_range_fields_reported() {
        let mut p = sample();
        p.age = 200;
        p.bmi = 61.0;
        let errors = p.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("age"));
        assert!(fields.contains_key("bmi"));
        assert_eq!(fields.len(), 2);
    }

    #[test]
    fn test_missing_field_fails_deserialization() {
        let body = r#"{"hba1c": 5.5, "glucose_postprandial": 140}"#;
        assert!(serde_json::from_str::<PatientData>(body).is_err());
    }

    fn body() -> Value {
        json!({
            "hba1c": 5.5, "glucose_postprandial": 140, "glucose_fasting": 90,
            "age": 35, "bmi": 24.5, "systolic_bp": 120, "cholesterol_total": 180,
            "physical_activity_minutes_per_week": 150
        })
    }

    #[test]
    fn test_integral_float_accepted() {
        let text = r#"{
            "hba1c": 5.5, "glucose_postprandial": 140.0, "glucose_fasting": 90,
            "age": 40.0, "bmi": 24.5, "systolic_bp": 120, "cholesterol_total": 180,
            "physical_activity_minutes_per_week": 150
        }"#;
        let p: PatientData = serde_json::from_str(text).unwrap();
        assert_eq!(p.glucose_postprandial, 140);
        assert_eq!(p.age, 40);

        let mut value = body();
        value["age"] = json!(40.0);
        assert_eq!(PatientData::from_json(value).unwrap().age, 40);
    }

    #[test]
    fn test_fractional_integer_field_rejected() {
        let text = r#"{
            "hba1c": 5.5, "glucose_postprandial": 140.5, "glucose_fasting": 90,
            "age": 35, "bmi": 24.5, "systolic_bp": 120, "cholesterol_total": 180,
            "physical_activity_minutes_per_week": 150
        }"#;
        let err = serde_json::from_str::<PatientData>(text).unwrap_err();
        assert!(err.to_string().contains("expected an integer"));

        let mut value = body();
        value["glucose_postprandial"] = json!(140.5);
        let errors = PatientData::from_json(value).unwrap_err();
        let fields = errors.field_errors();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields["glucose_postprandial"][0].code, "type");
    }

    #[test]
    fn test_fractional_float_field_kept() {
        let mut value = body();
        value["bmi"] = json!(27);
        value["hba1c"] = json!(6.25);
        let p = PatientData::from_json(value).unwrap();
        assert_eq!(p.bmi, 27.0);
        assert_eq!(p.hba1c, 6.25);
    }

    #[test]
    fn test_every_missing_field_reported() {
        let mut value = body();
        let fields = value.as_object_mut().unwrap();
        fields.remove("bmi");
        fields.remove("age");
        fields.insert("systolic_bp".to_string(), Value::Null);

        let errors = PatientData::from_json(value).unwrap_err();
        let fields = errors.field_errors();
        assert_eq!(fields.len(), 3);
        for name in ["bmi", "age", "systolic_bp"] {
            assert_eq!(fields[name][0].code, "required");
        }
    }

    #[test]
    fn test_non_numeric_and_non_object_rejected() {
        let mut value = body();
        value["hba1c"] = json!("high");
        let errors = PatientData::from_json(value).unwrap_err();
        assert_eq!(errors.field_errors()["hba1c"][0].code, "type");

        let errors = PatientData::from_json(json!([1, 2, 3])).unwrap_err();
        assert!(errors.field_errors().contains_key("body"));
    }

    #[test]
    fn test_vector_follows_layout_order() {
        let v = FeatureVector::from(&sample());
        assert_eq!(v.get(Feature::Hba1c), 5.5);
        assert_eq!(v.get(Feature::GlucosePostprandial), 140.0);
        assert_eq!(v.get(Feature::GlucoseFasting), 90.0);
        assert_eq!(v.get(Feature::Age), 35.0);
        assert_eq!(v.get(Feature::Bmi), 24.5);
        assert_eq!(v.get(Feature::SystolicBp), 120.0);
        assert_eq!(v.get(Feature::CholesterolTotal), 180.0);
        assert_eq!(v.get(Feature::PhysicalActivityMinutesPerWeek), 150.0);
    }
}

//! Sample analysis requests for the `demo` subcommand.
//!
//! All patients are fictional. Each request exercises a different part of
//! the engine: critical values, kidney staging, liver patterns, lipids,
//! thyroid and glycemic rules, medication cross-checks, and unknown tests.

use serde_json::{json, Value};

/// One named sample request.
pub struct Sample {
    pub title: &'static str,
    pub request: Value,
}

fn anemia_workup() -> Value {
    json!({
        "patient_age": 34,
        "patient_gender": "female",
        "current_medications": ["Ferrous sulfate 325 mg"],
        "lab_values": [
            { "test_name": "Hemoglobin", "value": 6.8, "unit": "g/dL", "panel": "CBC" },
            { "test_name": "MCV", "value": 68.0, "unit": "fL", "panel": "CBC" },
            { "test_name": "MCH", "value": 21.0, "unit": "pg", "panel": "CBC" },
            { "test_name": "RBC", "value": 3.6, "unit": "million/μL", "panel": "CBC" },
            { "test_name": "Platelets", "value": 410.0, "unit": "thousand/μL", "panel": "CBC" },
            { "test_name": "WBC", "value": 6.2, "unit": "thousand/μL", "panel": "CBC" }
        ]
    })
}

fn kidney_and_potassium() -> Value {
    json!({
        "patient_age": 68,
        "patient_gender": "male",
        "current_medications": ["Lisinopril 20 mg daily", "Metformin 1000 mg"],
        "lab_values": [
            { "test_name": "Creatinine", "value": 2.1, "unit": "mg/dL", "panel": "KFT" },
            { "test_name": "BUN", "value": 38.0, "unit": "mg/dL", "panel": "KFT" },
            { "test_name": "Potassium", "value": 5.9, "unit": "mEq/L", "panel": "KFT" },
            { "test_name": "Sodium", "value": 138.0, "unit": "mEq/L", "panel": "KFT" },
            { "test_name": "Fasting_Glucose", "value": 142.0, "unit": "mg/dL", "panel": "Glucose" },
            { "test_name": "HbA1c", "value": 7.4, "unit": "%", "panel": "Glucose" }
        ]
    })
}

fn liver_injury() -> Value {
    json!({
        "patient_age": 52,
        "patient_gender": "male",
        "current_medications": ["Atorvastatin 40 mg"],
        "lab_values": [
            { "test_name": "ALT", "value": 280.0, "unit": "U/L", "panel": "LFT" },
            { "test_name": "AST", "value": 245.0, "unit": "U/L", "panel": "LFT" },
            { "test_name": "ALP", "value": 110.0, "unit": "U/L", "panel": "LFT" },
            { "test_name": "Bilirubin_Total", "value": 0.9, "unit": "mg/dL", "panel": "LFT" },
            { "test_name": "Albumin", "value": 4.1, "unit": "g/dL", "panel": "LFT" }
        ]
    })
}

fn cardiometabolic() -> Value {
    json!({
        "patient_age": 47,
        "patient_gender": "female",
        "lab_values": [
            { "test_name": "Total Cholesterol", "value": 248.0, "unit": "mg/dL", "panel": "Lipid" },
            { "test_name": "HDL", "value": 42.0, "unit": "mg/dL", "panel": "Lipid" },
            { "test_name": "LDL", "value": 165.0, "unit": "mg/dL", "panel": "Lipid" },
            { "test_name": "Triglycerides", "value": 210.0, "unit": "mg/dL", "panel": "Lipid" },
            { "test_name": "TSH", "value": 7.8, "unit": "μIU/mL", "panel": "Thyroid" },
            { "test_name": "Free_T4", "value": 1.1, "unit": "ng/dL", "panel": "Thyroid" },
            { "test_name": "Vitamin_D", "value": 18.0, "unit": "ng/mL", "panel": "Lipid" }
        ]
    })
}

/// Every sample, in display order.
pub fn all() -> Vec<Sample> {
    vec![
        Sample { title: "Severe microcytic anemia", request: anemia_workup() },
        Sample { title: "Reduced kidney function on an ACE inhibitor", request: kidney_and_potassium() },
        Sample { title: "Hepatocellular enzyme elevation", request: liver_injury() },
        Sample { title: "Dyslipidemia with subclinical thyroid finding", request: cardiometabolic() },
    ]
}

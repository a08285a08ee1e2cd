//! JSON Schema for the serialized `AnalysisResult`.

use serde_json::{json, Value};

const TIERS: [&str; 5] = [
    "normal",
    "mild_abnormal",
    "moderate_abnormal",
    "severe_abnormal",
    "critical",
];
const COLORS: [&str; 4] = ["green", "yellow", "orange", "red"];
const QUALIFIERS: [&str; 4] = ["advisory", "possible", "likely", "marked"];

fn count() -> Value {
    json!({ "type": "integer", "minimum": 0 })
}

/// Structural schema every analysis result must satisfy.
pub fn result_schema() -> Value {
    json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "type": "object",
        "required": [
            "results_summary",
            "critical_values",
            "abnormalities",
            "calculated_metrics",
            "pattern_findings",
            "all_results",
            "unrecognized_values",
            "rejected_values"
        ],
        "properties": {
            "results_summary": {
                "type": "object",
                "required": ["total_tests", "normal_count", "abnormal_count", "critical_count"],
                "properties": {
                    "total_tests": count(),
                    "normal_count": count(),
                    "abnormal_count": count(),
                    "critical_count": count()
                }
            },
            "critical_values": {
                "type": "array",
                "items": {
                    "type": "object",
                    "required": ["test", "value", "unit", "reference_range"],
                    "properties": {
                        "test": { "type": "string", "minLength": 1 },
                        "value": { "type": "number" }
                    }
                }
            },
            "abnormalities": {
                "type": "array",
                "items": {
                    "type": "object",
                    "required": ["test", "value", "severity", "label", "color"],
                    "properties": {
                        "value": { "type": "number" },
                        "severity": { "enum": ["mild_abnormal", "moderate_abnormal", "severe_abnormal"] },
                        "direction": { "enum": ["low", "high"] },
                        "color": { "enum": COLORS }
                    }
                }
            },
            "calculated_metrics": {
                "type": "object",
                "properties": {
                    "egfr": count(),
                    "cholesterol_ratios": {
                        "type": "object",
                        "additionalProperties": { "type": "number" }
                    },
                    "cardiac_risk": {
                        "type": "object",
                        "required": ["risk", "color", "basis", "value"],
                        "properties": {
                            "risk": { "enum": ["Low", "Moderate", "High"] },
                            "color": { "enum": COLORS }
                        }
                    }
                }
            },
            "pattern_findings": {
                "type": "array",
                "items": {
                    "type": "object",
                    "required": ["name", "evidence", "qualifier"],
                    "properties": {
                        "name": { "type": "string", "minLength": 1 },
                        "evidence": { "type": "array" },
                        "qualifier": { "enum": QUALIFIERS }
                    }
                }
            },
            "all_results": {
                "type": "array",
                "items": {
                    "type": "object",
                    "required": ["test", "key", "value", "unit", "panel", "reference_range", "severity", "label", "color"],
                    "properties": {
                        "value": { "type": "number" },
                        "severity": { "enum": TIERS },
                        "direction": { "enum": ["low", "high"] },
                        "color": { "enum": COLORS }
                    }
                }
            },
            "unrecognized_values": { "type": "array" },
            "rejected_values": {
                "type": "array",
                "items": {
                    "type": "object",
                    "required": ["test", "reason"]
                }
            }
        }
    })
}

// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Text rendering of the capture session for the terminal

use crate::capture::{Advisory, CaptureSession, Phase};
use crate::recognition::RecognitionResult;

/// Results panel: food name then one line per nutrient, in server order
pub fn results_panel(result: &RecognitionResult) -> Option<String> {
    match result {
        RecognitionResult::Recognized {
            food_name,
            nutrients,
        } => {
            let mut out = String::from("Nutrition Information:\n");
            out.push_str(&format!("Food Name: {}\n", food_name));
            for nutrient in nutrients {
                out.push_str(&format!("  {}\n", nutrient));
            }
            Some(out)
        }
        _ => None,
    }
}

pub fn advisory_line(advisory: &Advisory) -> String {
    format!("⚠️  {}: {}", advisory.title, advisory.message)
}

/// One-line summary of the session for the `status` command
pub fn status_line(session: &CaptureSession) -> String {
    let phase = match session.phase() {
        Phase::Idle => "idle",
        Phase::CameraOpen => "camera open",
        Phase::Capturing => "capturing",
        Phase::Normalizing => "normalizing",
        Phase::Recognizing => "recognizing",
    };
    let image = session
        .image()
        .map(|i| format!("{} ({}x{})", i.uri, i.width, i.height))
        .unwrap_or_else(|| "none".to_string());
    let result = session.result().map(|r| r.kind()).unwrap_or("none");

    format!(
        "phase={} camera={} busy={} image={} result={}",
        phase,
        if session.camera_open() { "open" } else { "closed" },
        session.in_flight(),
        image,
        result
    )
}

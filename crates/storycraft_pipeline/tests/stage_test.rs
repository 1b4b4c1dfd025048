//! Stage-level and document runner tests.

mod test_utils;

use async_trait::async_trait;
use serde_json::{Value, json};
use std::sync::Arc;
use storycraft_core::{BlueprintDocument, Language, ScenarioBlueprint};
use storycraft_error::StorycraftResult;
use storycraft_interface::TextGenerator;
use storycraft_models::{MockImageGenerator, MockTextGenerator, scenario, storyboard};
use storycraft_pipeline::{
    CharacterSheetStage, MusicCache, PipelineStage, ScenarioRequest, ScenarioStage,
    SceneProcessor, Stage, StoryboardStage, scenario_document, scene_document,
    select_scene_document, stage_document,
};
use storycraft_retry::RetryPolicy;
use storycraft_storage::AssetStore;
use test_utils::{
    BUCKET, CannedStoryboard, FailingVideo, Harness, PITCH, fast_settings, request,
};

/// Text generator returning one fixed answer.
struct Fixed(String);

#[async_trait]
impl TextGenerator for Fixed {
    async fn generate(&self, _prompt: &str) -> StorycraftResult<String> {
        Ok(self.0.clone())
    }

    fn model_name(&self) -> &str {
        "fixed"
    }
}

fn fixed(answer: impl Into<String>) -> Arc<dyn TextGenerator> {
    Arc::new(Fixed(answer.into()))
}

async fn scenario_blueprint() -> ScenarioBlueprint {
    ScenarioStage::new(Arc::new(MockTextGenerator::new()), RetryPolicy::disabled())
        .run(request(2))
        .await
        .unwrap()
}

#[tokio::test]
async fn test_scenario_stage_stamps_request_fields() {
    let stage = ScenarioStage::new(Arc::new(MockTextGenerator::new()), RetryPolicy::disabled());
    let request = ScenarioRequest::builder()
        .pitch(PITCH)
        .num_scenes(2u32)
        .style("Watercolor")
        .language(Language::new("French", "fr-FR"))
        .build()
        .unwrap();
    let blueprint = stage.run(request).await.unwrap();

    assert_eq!(blueprint.pitch(), PITCH);
    assert_eq!(blueprint.style(), "Watercolor");
    assert_eq!(blueprint.language().code, "fr-FR");
    assert_eq!(blueprint.genre(), "Cinematic");
    assert!(blueprint.music_description().contains("orchestral"));
    assert!(blueprint.scenario_text().contains("Eva Rostova"));
    assert_eq!(blueprint.characters()[0].description().split(". ").count(), 2);
    assert!(blueprint.scenes().is_empty());
}

#[tokio::test]
async fn test_scenario_stage_truncates_props() {
    let mut answer = scenario();
    answer["props"] = json!([
        {"name": "Plant", "description": "glows"},
        {"name": "Rover", "description": "dusty"},
        {"name": "Flag", "description": "limp"}
    ]);
    let stage = ScenarioStage::new(fixed(format!("Sure:\n{answer}\nDone.")), RetryPolicy::disabled());
    let blueprint = stage.run(request(1)).await.unwrap();

    let names: Vec<&str> = blueprint.props().iter().map(|p| p.name().as_str()).collect();
    assert_eq!(names, vec!["Plant", "Rover"]);
}

#[tokio::test]
async fn test_scenario_stage_rejects_bad_input() {
    let stage = ScenarioStage::new(Arc::new(MockTextGenerator::new()), RetryPolicy::disabled());

    let blank = ScenarioRequest::builder().pitch(" \n").build().unwrap();
    assert_eq!(
        stage.run(blank).await.unwrap_err().category(),
        "InputValidationError"
    );

    let zero = ScenarioRequest::builder().pitch(PITCH).num_scenes(0u32).build().unwrap();
    assert_eq!(
        stage.run(zero).await.unwrap_err().category(),
        "InputValidationError"
    );
}

#[tokio::test]
async fn test_scenario_stage_unparseable_response() {
    let stage = ScenarioStage::new(fixed("I would rather write a poem."), RetryPolicy::disabled());
    let err = stage.run(request(1)).await.unwrap_err();
    assert_eq!(err.category(), "UpstreamGenerationError");
}

#[tokio::test]
async fn test_character_sheets_preserve_entries() {
    let harness = Harness::new();
    let mut value = serde_json::to_value(scenario_blueprint().await).unwrap();
    value["characters"][0]["age"] = json!(38);
    let blueprint: ScenarioBlueprint = serde_json::from_value(value.clone()).unwrap();

    let stage = CharacterSheetStage::new(
        Arc::new(MockImageGenerator::new(harness.store.clone())),
        harness.store.namer().clone(),
        RetryPolicy::disabled(),
    );
    let sheets = stage.run(blueprint).await.unwrap();
    assert_eq!(sheets.failed, 0);

    let enriched = serde_json::to_value(&sheets.blueprint).unwrap();
    for roster in ["characters", "settings", "props"] {
        let before = value[roster].as_array().unwrap();
        let after = enriched[roster].as_array().unwrap();
        assert_eq!(before.len(), after.len());
        for (old, new) in before.iter().zip(after) {
            let mut new = new.clone();
            let uri = new.as_object_mut().unwrap().remove("imageUri").unwrap();
            assert!(uri.as_str().unwrap().starts_with(&format!("{BUCKET}/mock-images/")));
            assert_eq!(old, &new);
        }
    }
    assert_eq!(enriched["characters"][0]["age"], 38);
}

#[tokio::test]
async fn test_storyboard_yields_requested_count() {
    for n in [1u32, 3, 7] {
        let stage = StoryboardStage::new(Arc::new(MockTextGenerator::new()), RetryPolicy::disabled(), n);
        let blueprint = stage.run(scenario_blueprint().await).await.unwrap();
        assert_eq!(blueprint.scenes().len(), n as usize);
    }
}

#[tokio::test]
async fn test_storyboard_truncates_extra_scenes() {
    let answer = json!({ "scenes": storyboard(4) }).to_string();
    let stage = StoryboardStage::new(Arc::new(CannedStoryboard::new(answer)), RetryPolicy::disabled(), 2);
    let blueprint = stage.run(scenario_blueprint().await).await.unwrap();
    assert_eq!(blueprint.scenes().len(), 2);
}

#[tokio::test]
async fn test_storyboard_fails_closed() {
    let short = json!({ "scenes": storyboard(1) }).to_string();
    for answer in [short.as_str(), "no json at all", r#"{"shots": []}"#] {
        let stage = StoryboardStage::new(fixed(answer), RetryPolicy::disabled(), 3);
        let blueprint = stage.run(scenario_blueprint().await).await.unwrap();
        assert!(blueprint.scenes().is_empty(), "{answer}");
    }
}

#[tokio::test]
async fn test_storyboard_drops_unknown_characters() {
    let mut scenes = storyboard(1);
    scenes[0]["charactersPresent"] = json!(["Dr. Eva Rostova", "Mission Control"]);
    let answer = json!({ "scenes": scenes }).to_string();
    let stage = StoryboardStage::new(fixed(answer), RetryPolicy::disabled(), 1);
    let blueprint = stage.run(scenario_blueprint().await).await.unwrap();

    assert_eq!(
        blueprint.scenes()[0].characters_present(),
        &vec!["Dr. Eva Rostova".to_string()]
    );
    assert!(blueprint.validate().is_ok());
}

#[tokio::test]
async fn test_pipeline_reports_no_scenes() {
    let harness = Harness::new().with_text(Arc::new(CannedStoryboard::new("{\"scenes\": []}")));
    let output = harness.pipeline(fast_settings()).run(request(2)).await;

    assert_eq!(output.final_uri, format!("{BUCKET}/error.mp4"));
    assert_eq!(
        output.report.status(PipelineStage::Storyboard),
        storycraft_pipeline::StageStatus::Failed
    );
    assert!(output.report.error.unwrap().contains("no scenes"));
}

#[tokio::test]
async fn test_document_runners_never_fail() {
    let stage = StoryboardStage::new(Arc::new(MockTextGenerator::new()), RetryPolicy::disabled(), 1);

    let output: Value = serde_json::from_str(&stage_document(&stage, "{broken").await).unwrap();
    assert_eq!(output["error"], "Invalid JSON input");

    let output: Value = serde_json::from_str(&stage_document(&stage, "[1, 2]").await).unwrap();
    assert_eq!(output["error"], "Invalid JSON input");

    let upstream = r#"{"error": "Scenario failed", "details": "quota"}"#;
    let output: Value = serde_json::from_str(&stage_document(&stage, upstream).await).unwrap();
    assert_eq!(output, serde_json::from_str::<Value>(upstream).unwrap());
}

#[tokio::test]
async fn test_document_runners_chain() {
    let harness = Harness::new();
    let capabilities = harness.capabilities();
    let retry = RetryPolicy::disabled();

    let scenario = ScenarioStage::new(capabilities.text().clone(), retry);
    let doc = scenario_document(&scenario, request(2)).await;

    let sheets = CharacterSheetStage::new(
        capabilities.image().clone(),
        capabilities.store().namer().clone(),
        retry,
    );
    let doc = stage_document(&sheets, &doc).await;

    let storyboard = StoryboardStage::new(capabilities.text().clone(), retry, 2);
    let doc = stage_document(&storyboard, &doc).await;

    let music = Arc::new(MusicCache::new(capabilities.music().clone(), retry, "ambient"));
    let processor = SceneProcessor::new(&capabilities, music, fast_settings());
    let doc = scene_document(&processor, &doc, 9).await;

    let blueprint = BlueprintDocument::parse(&doc).into_result().unwrap();
    assert_eq!(blueprint.scenes().len(), 2);
    assert!(blueprint.scenes()[0].video_clip_uri().is_none());
    assert!(blueprint.scenes()[1].video_clip_uri().is_some());
    assert!(blueprint.characters()[0].image_uri().is_some());
}

#[tokio::test]
async fn test_failed_scene_document_keeps_keyframe() {
    let harness = Harness::new().with_video(Arc::new(FailingVideo));
    let capabilities = harness.capabilities();
    let retry = RetryPolicy::disabled();

    let scenario = ScenarioStage::new(capabilities.text().clone(), retry);
    let doc = scenario_document(&scenario, request(1)).await;
    let sheets = CharacterSheetStage::new(
        capabilities.image().clone(),
        capabilities.store().namer().clone(),
        retry,
    );
    let doc = stage_document(&sheets, &doc).await;
    let storyboard = StoryboardStage::new(capabilities.text().clone(), retry, 1);
    let doc = stage_document(&storyboard, &doc).await;

    let music = Arc::new(MusicCache::new(capabilities.music().clone(), retry, "ambient"));
    let processor = SceneProcessor::new(&capabilities, music, fast_settings());
    let output: Value = serde_json::from_str(&scene_document(&processor, &doc, 0).await).unwrap();

    assert_eq!(output["error"], "Scene processing failed");
    let details = output["details"].as_str().unwrap();
    assert!(details.contains("safety filter"), "{details}");
    let keyframe = details
        .split("keyframe kept at ")
        .nth(1)
        .and_then(|rest| rest.strip_suffix(')'))
        .unwrap();
    assert!(keyframe.starts_with(&format!("{BUCKET}/scene_keyframes/")));
    assert!(harness.store.exists(keyframe).await.unwrap());
}

#[tokio::test]
async fn test_scenario_document_renders_failures() {
    let scenario = ScenarioStage::new(fixed("nothing useful"), RetryPolicy::disabled());
    let output: Value = serde_json::from_str(&scenario_document(&scenario, request(1)).await).unwrap();
    assert_eq!(output["error"], "UpstreamGenerationError");
    assert!(output["details"].as_str().unwrap().contains("no JSON found"));
}

#[test]
fn test_select_scene_document_clamps() {
    let blueprint = json!({
        "pitch": PITCH,
        "scenes": storyboard(2)
    })
    .to_string();

    let selected: Value = serde_json::from_str(&select_scene_document(&blueprint, 5)).unwrap();
    assert_eq!(selected["videoPrompt"]["Action"], storyboard(2)[1]["videoPrompt"]["Action"]);
    assert_eq!(selected["voiceoverText"], storyboard(2)[1]["voiceover"]);

    let empty: Value =
        serde_json::from_str(&select_scene_document(r#"{"pitch": "x"}"#, 0)).unwrap();
    assert_eq!(empty, json!({"imagePrompt": {}, "videoPrompt": {}, "voiceoverText": ""}));
}

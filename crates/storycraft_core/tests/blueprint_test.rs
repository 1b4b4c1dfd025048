use serde_json::{Value, json};
use storycraft_core::{
    AspectRatio, BlueprintDocument, RosterKind, ScenarioBlueprint, Scene, SceneArtifact,
    ShotType, select_scene,
};
use strum::IntoEnumIterator;

fn generator_output() -> Value {
    json!({
        "pitch": "A lone astronaut discovers a glowing plant on the moon",
        "style": "Cinematic",
        "language": {"name": "English", "code": "en-US"},
        "scenario": "Dr. Eva Rostova finds a plant glowing in a crater.",
        "genre": "Sci-Fi",
        "mood": "Wonder",
        "music": ["Ambient synth pads.", "Slow build."],
        "characters": [{
            "name": "Dr. Eva Rostova",
            "description": ["Late 30s.", "White spacesuit."],
            "voice": "Calm, low alto",
            "backstory": "Botanist turned astronaut"
        }],
        "settings": [{"name": "Shackleton Crater", "description": "Dark crater rim"}],
        "props": [],
        "scenes": [{
            "imagePrompt": {"Subject": [{"name": "Dr. Eva Rostova"}, "Dr. Eva Rostova"]},
            "videoPrompt": {"Action": "Eva kneels", "Camera Motion": "Slow push in"},
            "description": "Eva kneels beside the plant.",
            "voiceover": "Life, where none should be.",
            "charactersPresent": ["Dr. Eva Rostova"]
        }],
        "projectId": "demo-42"
    })
}

#[test]
fn aliases_and_lists_are_normalized() {
    let blueprint: ScenarioBlueprint = serde_json::from_value(generator_output()).unwrap();

    assert_eq!(
        blueprint.scenario_text(),
        "Dr. Eva Rostova finds a plant glowing in a crater."
    );
    assert_eq!(blueprint.music_description(), "Ambient synth pads. Slow build.");
    assert_eq!(blueprint.characters()[0].description(), "Late 30s. White spacesuit.");
    assert_eq!(blueprint.scenes()[0].voiceover_text(), "Life, where none should be.");
    assert_eq!(
        blueprint.scenes()[0].subject_names(),
        vec!["Dr. Eva Rostova".to_string()]
    );
    assert!(blueprint.validate().is_ok());
}

#[test]
fn unknown_keys_survive_a_round_trip() {
    let blueprint: ScenarioBlueprint = serde_json::from_value(generator_output()).unwrap();
    let written = serde_json::to_value(&blueprint).unwrap();

    assert_eq!(written["projectId"], "demo-42");
    assert_eq!(written["characters"][0]["backstory"], "Botanist turned astronaut");
    assert_eq!(written["scenarioText"], blueprint.scenario_text().as_str());
    assert!(written.get("scenario").is_none());
    assert!(written["characters"][0].get("imageUri").is_none());
}

#[test]
fn video_settings_default_and_override() {
    let mut value = generator_output();
    let blueprint: ScenarioBlueprint = serde_json::from_value(value.clone()).unwrap();
    assert_eq!(blueprint.video_settings().aspect_ratio, AspectRatio::Landscape);
    assert_eq!(blueprint.video_settings().duration_seconds, 8);

    value["aspectRatio"] = json!("9:16");
    value["durationSeconds"] = json!(5);
    let blueprint: ScenarioBlueprint = serde_json::from_value(value).unwrap();
    assert_eq!(blueprint.video_settings().aspect_ratio, AspectRatio::Portrait);
    assert_eq!(blueprint.video_settings().duration_seconds, 5);
}

#[test]
fn roster_kinds_iterate_in_processing_order() {
    let kinds: Vec<_> = RosterKind::iter().collect();
    assert_eq!(
        kinds,
        vec![RosterKind::Character, RosterKind::Setting, RosterKind::Prop]
    );
    let shots: Vec<_> = kinds.iter().map(RosterKind::shot_type).collect();
    assert_eq!(shots, vec![ShotType::Medium, ShotType::Wide, ShotType::Close]);
    let ratios: Vec<_> = kinds.iter().map(RosterKind::aspect_ratio).collect();
    assert_eq!(
        ratios,
        vec![AspectRatio::Square, AspectRatio::Landscape, AspectRatio::Square]
    );
}

#[test]
fn roster_enrichment_only_adds_image_uri() {
    let mut blueprint: ScenarioBlueprint = serde_json::from_value(generator_output()).unwrap();
    let before = serde_json::to_value(&blueprint.characters()[0]).unwrap();

    blueprint.roster_mut(RosterKind::Character)[0].set_image_uri("gs://b/mock-images/eva.png");
    let mut after = serde_json::to_value(&blueprint.characters()[0]).unwrap();

    assert_eq!(after["imageUri"], "gs://b/mock-images/eva.png");
    after.as_object_mut().unwrap().remove("imageUri");
    assert_eq!(before, after);
    assert_eq!(
        blueprint.character_image("Dr. Eva Rostova"),
        Some("gs://b/mock-images/eva.png")
    );
    assert_eq!(blueprint.character_image("Nobody"), None);
}

#[test]
fn scene_artifacts_are_forward_only() {
    let mut scene = Scene::default();
    assert!(scene.artifact(SceneArtifact::Keyframe).is_none());

    scene.record(0, SceneArtifact::Keyframe, "gs://b/scene_keyframes/a.png").unwrap();
    scene.record(0, SceneArtifact::Keyframe, "gs://b/scene_keyframes/a.png").unwrap();
    let err = scene
        .record(0, SceneArtifact::Keyframe, "gs://b/scene_keyframes/b.png")
        .unwrap_err();

    assert_eq!(err.category(), "InputValidationError");
    assert!(err.to_string().contains("keyframeUri"));
    assert_eq!(
        scene.artifact(SceneArtifact::Keyframe),
        Some("gs://b/scene_keyframes/a.png")
    );
}

#[test]
fn blank_voiceover_is_not_narrated() {
    let scene: Scene = serde_json::from_value(json!({"voiceoverText": "   "})).unwrap();
    assert!(!scene.has_voiceover());
    assert_eq!(scene.image_prompt(), &json!({}));
}

#[test]
fn select_scene_on_parsed_document() {
    let doc = BlueprintDocument::parse(&generator_output().to_string());
    let blueprint = doc.into_result().unwrap();

    let selection = select_scene(&blueprint, 7);
    assert_eq!(selection.voiceover_text, "Life, where none should be.");
    assert_eq!(selection.video_prompt["Action"], "Eva kneels");
}

#[test]
fn invalid_json_becomes_error_document() {
    let doc = BlueprintDocument::parse("{ not json");
    let json: Value = serde_json::from_str(&doc.to_json()).unwrap();
    assert_eq!(json["error"], "Invalid JSON input");
    assert!(json["details"].is_string());
}

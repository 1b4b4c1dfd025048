//! End-to-end orchestrator tests against the mock capabilities.

mod test_utils;

use std::sync::Arc;
use std::time::Duration;
use storycraft_core::SceneArtifact;
use storycraft_models::MockVideoGenerator;
use storycraft_pipeline::{PipelineSettings, PipelineStage, StageStatus};
use storycraft_retry::RetryPolicy;
use storycraft_storage::{AssetCategory, AssetStore};
use test_utils::{
    BUCKET, FailingVideo, FlakyText, Harness, RecordingImage, SelectiveVideo, StaggeredVideo,
    StalledKeyframes, StalledText, fast_settings, request,
};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

#[tokio::test]
async fn test_lone_astronaut_single_scene() {
    let harness = Harness::new();
    let output = harness.pipeline(fast_settings()).run(request(1)).await;

    assert!(output.is_success(), "{:?}", output.report);
    assert!(output.final_uri.starts_with(&format!("{BUCKET}/final_videos/")));
    assert!(output.final_uri.ends_with(".mp4"));
    assert!(output.report.succeeded());
    assert!(!output.report.partial);

    let blueprint = output.blueprint.expect("blueprint");
    assert_eq!(blueprint.characters().len(), 1);
    assert!(!blueprint.settings().is_empty());
    assert_eq!(blueprint.scenes().len(), 1);
    assert_eq!(
        blueprint.pitch(),
        "A lone astronaut discovers a glowing plant on the moon"
    );
    assert!(blueprint.characters()[0].image_uri().is_some());

    let scene = &blueprint.scenes()[0];
    assert!(scene.artifact(SceneArtifact::Keyframe).is_some());
    assert!(scene.artifact(SceneArtifact::VideoClip).is_some());
    assert!(scene.artifact(SceneArtifact::Voiceover).is_some());
    assert!(blueprint.validate().is_ok());
}

#[tokio::test]
async fn test_all_scenes_failing_yields_sentinel() {
    let harness = Harness::new().with_video(Arc::new(FailingVideo));
    let output = harness.pipeline(fast_settings()).run(request(2)).await;

    assert_eq!(output.final_uri, format!("{BUCKET}/error.mp4"));
    assert!(!output.is_success());
    assert_eq!(output.report.status(PipelineStage::Storyboard), StageStatus::Succeeded);
    assert_eq!(output.report.status(PipelineStage::SceneFanOut), StageStatus::Failed);
    assert_eq!(output.report.status(PipelineStage::Stitch), StageStatus::Skipped);
    assert_eq!(output.report.failed_scenes.len(), 2);
    assert!(output.report.failed_scenes[0].reason.contains("safety filter"));
    assert!(output.report.error.as_deref().unwrap_or("").contains("all 2 scenes failed"));
    assert!(harness.stitch.last_request().await.is_none());

    // Keyframes produced before the failure stay on the blueprint.
    let blueprint = output.blueprint.expect("blueprint");
    assert!(blueprint.scenes()[0].artifact(SceneArtifact::Keyframe).is_some());
    assert!(blueprint.scenes()[0].artifact(SceneArtifact::VideoClip).is_none());
}

#[tokio::test]
async fn test_single_failed_scene_still_stitches() {
    let harness = Harness::new();
    let video = Arc::new(SelectiveVideo::new(harness.store.clone(), "gloved hand"));
    let harness = harness.with_video(video);
    let output = harness.pipeline(fast_settings()).run(request(3)).await;

    assert!(output.is_success(), "{:?}", output.report);
    assert!(output.report.partial);
    assert_eq!(output.report.failed_scenes.len(), 1);
    assert_eq!(output.report.failed_scenes[0].index, 1);
    assert_eq!(output.report.status(PipelineStage::Stitch), StageStatus::Succeeded);

    let stitched = harness.stitch.last_request().await.expect("stitch request");
    assert_eq!(stitched.clips().len(), 2);
    assert_eq!(stitched.voiceovers().len(), 2);
}

#[tokio::test]
async fn test_music_generated_once_under_concurrency() {
    let harness = Harness::new();
    let settings = PipelineSettings::builder()
        .concurrency(3usize)
        .retry(RetryPolicy::disabled())
        .poll_interval(Duration::from_millis(1))
        .build()
        .unwrap();
    let output = harness.pipeline(settings).run(request(5)).await;

    assert!(output.is_success(), "{:?}", output.report);
    assert_eq!(harness.music.calls(), 1);
    let stitched = harness.stitch.last_request().await.expect("stitch request");
    assert!(stitched.music().is_some());
    assert_eq!(harness.store.uris_in(AssetCategory::Music).await.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_fan_out_preserves_scene_order() {
    let harness = Harness::new();
    let video = Arc::new(StaggeredVideo::new(
        harness.store.clone(),
        vec![
            ("mid-stride", Duration::from_millis(300)),
            ("gloved hand", Duration::from_millis(200)),
            ("ripples", Duration::from_millis(100)),
        ],
    ));
    let harness = harness.with_video(video);
    let settings = PipelineSettings::builder()
        .concurrency(3usize)
        .retry(RetryPolicy::disabled())
        .poll_interval(Duration::from_millis(1))
        .build()
        .unwrap();
    let output = harness.pipeline(settings).run(request(3)).await;
    assert!(output.is_success(), "{:?}", output.report);

    let blueprint = output.blueprint.expect("blueprint");
    let expected: Vec<String> = blueprint
        .scenes()
        .iter()
        .filter_map(|scene| scene.artifact(SceneArtifact::VideoClip).map(str::to_string))
        .collect();
    let stitched = harness.stitch.last_request().await.expect("stitch request");
    assert_eq!(stitched.clips(), &expected);

    let first = harness.store.retrieve(&stitched.clips()[0]).await.unwrap();
    assert!(String::from_utf8_lossy(&first).contains("mid-stride"));
    let last = harness.store.retrieve(&stitched.clips()[2]).await.unwrap();
    assert!(String::from_utf8_lossy(&last).contains("ripples"));
}

#[tokio::test]
async fn test_blank_voiceover_is_skipped() {
    let harness = Harness::new();
    let output = harness.pipeline(fast_settings()).run(request(3)).await;
    assert!(output.is_success(), "{:?}", output.report);

    // The third storyboard beat has no narration.
    assert_eq!(harness.speech.calls(), 2);
    let blueprint = output.blueprint.expect("blueprint");
    assert!(blueprint.scenes()[2].artifact(SceneArtifact::Voiceover).is_none());

    let stitched = harness.stitch.last_request().await.expect("stitch request");
    assert_eq!(stitched.voiceovers()[2], "");
    assert!(!stitched.voiceovers()[0].is_empty());
}

#[tokio::test]
async fn test_failed_references_use_sentinel_and_are_omitted() {
    let harness = Harness::new();
    let image = Arc::new(RecordingImage::new(harness.store.clone(), true));
    let harness = harness.with_image(image.clone());
    let output = harness.pipeline(fast_settings()).run(request(1)).await;

    assert!(output.is_success(), "{:?}", output.report);
    assert_eq!(output.report.reference_image_failures, 4);

    let blueprint = output.blueprint.expect("blueprint");
    assert_eq!(
        blueprint.characters()[0].image_uri().as_deref(),
        Some(format!("{BUCKET}/error.png").as_str())
    );

    let keyframes = image.requests_in(AssetCategory::SceneKeyframes).await;
    assert_eq!(keyframes.len(), 1);
    assert!(keyframes[0].reference_images().is_empty());
}

#[tokio::test]
async fn test_keyframe_uses_character_reference() {
    let harness = Harness::new();
    let image = Arc::new(RecordingImage::new(harness.store.clone(), false));
    let harness = harness.with_image(image.clone());
    let output = harness.pipeline(fast_settings()).run(request(1)).await;
    assert!(output.is_success(), "{:?}", output.report);

    let blueprint = output.blueprint.expect("blueprint");
    let reference = blueprint.character_image("Dr. Eva Rostova").unwrap().to_string();
    let keyframes = image.requests_in(AssetCategory::SceneKeyframes).await;
    assert_eq!(keyframes[0].reference_images(), &vec![reference]);

    let references = image.requests_in(AssetCategory::ReferenceImages).await;
    assert_eq!(references.len(), 4);
    assert!(references[0].prompt().contains("\"shot_type\": \"medium\""));
    assert!(references[1].prompt().contains("\"shot_type\": \"wide\""));
    assert!(references[3].prompt().contains("\"shot_type\": \"close\""));
}

#[tokio::test(start_paused = true)]
async fn test_video_poll_timeout_cancels_job() {
    let harness = Harness::new();
    let video = Arc::new(MockVideoGenerator::new(harness.store.clone(), 10_000));
    let harness = harness.with_video(video.clone());
    let settings = PipelineSettings::builder()
        .retry(RetryPolicy::disabled())
        .poll_interval(Duration::from_millis(100))
        .poll_timeout(Duration::from_secs(1))
        .build()
        .unwrap();
    let output = harness.pipeline(settings).run(request(1)).await;

    assert!(!output.is_success());
    assert!(output.report.failed_scenes[0].reason.contains("timed out"));
    assert_eq!(video.cancelled_jobs().await.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_run_timeout_yields_sentinel_and_cancels_jobs() {
    let harness = Harness::new();
    let video = Arc::new(MockVideoGenerator::new(harness.store.clone(), 10_000));
    let harness = harness.with_video(video.clone());
    let settings = PipelineSettings::builder()
        .retry(RetryPolicy::disabled())
        .poll_interval(Duration::from_millis(100))
        .poll_timeout(Duration::from_secs(3600))
        .run_timeout(Some(Duration::from_secs(2)))
        .build()
        .unwrap();
    let output = harness.pipeline(settings).run(request(2)).await;

    assert_eq!(output.final_uri, format!("{BUCKET}/error.mp4"));
    assert!(output.report.error.as_deref().unwrap_or("").contains("timed out after 2s"));
    assert_eq!(output.report.status(PipelineStage::SceneFanOut), StageStatus::Failed);
    assert_eq!(output.report.status(PipelineStage::Stitch), StageStatus::Skipped);
    assert_eq!(video.cancelled_jobs().await.len(), 1);
    assert_eq!(output.report.skipped_scenes, vec![1]);
}

#[tokio::test]
async fn test_cancelled_before_start_skips_everything() {
    let harness = Harness::new();
    let token = CancellationToken::new();
    token.cancel();
    let output = harness
        .pipeline(fast_settings())
        .run_with_cancel(request(1), token)
        .await;

    assert_eq!(output.final_uri, format!("{BUCKET}/error.mp4"));
    assert!(output.blueprint.is_none());
    assert!(
        output
            .report
            .stages
            .values()
            .all(|status| *status == StageStatus::Skipped)
    );
}

#[tokio::test]
async fn test_empty_pitch_fails_scenario_stage() {
    let harness = Harness::new();
    let request = storycraft_pipeline::ScenarioRequest::builder()
        .pitch("   ")
        .num_scenes(1u32)
        .build()
        .unwrap();
    let output = harness.pipeline(fast_settings()).run(request).await;

    assert_eq!(output.final_uri, format!("{BUCKET}/error.mp4"));
    assert_eq!(output.report.status(PipelineStage::Scenario), StageStatus::Failed);
    assert_eq!(output.report.status(PipelineStage::CharacterSheets), StageStatus::Skipped);
    assert!(output.blueprint.is_none());
    assert!(harness.store.is_empty().await);
}

fn timed_settings(retry: RetryPolicy, run_timeout: Duration) -> PipelineSettings {
    PipelineSettings::builder()
        .retry(retry)
        .poll_interval(Duration::from_millis(1))
        .run_timeout(Some(run_timeout))
        .build()
        .unwrap()
}

#[tokio::test(start_paused = true)]
async fn test_run_timeout_interrupts_stalled_scenario() {
    let harness = Harness::new().with_text(Arc::new(StalledText));
    let settings = timed_settings(RetryPolicy::disabled(), Duration::from_secs(2));

    let started = Instant::now();
    let output = harness.pipeline(settings).run(request(1)).await;

    assert!(started.elapsed() < Duration::from_secs(3), "{:?}", started.elapsed());
    assert_eq!(output.final_uri, format!("{BUCKET}/error.mp4"));
    assert!(output.report.error.as_deref().unwrap_or("").contains("timed out after 2s"));
    assert_eq!(output.report.status(PipelineStage::Scenario), StageStatus::Failed);
    assert_eq!(output.report.status(PipelineStage::CharacterSheets), StageStatus::Skipped);
}

#[tokio::test(start_paused = true)]
async fn test_run_timeout_interrupts_retry_backoff() {
    let harness = Harness::new().with_text(Arc::new(FlakyText));
    // Backoff alone would wait well over ten minutes
    let settings = timed_settings(RetryPolicy::new(60_000, 5, 600), Duration::from_secs(2));

    let started = Instant::now();
    let output = harness.pipeline(settings).run(request(1)).await;

    assert!(started.elapsed() < Duration::from_secs(3), "{:?}", started.elapsed());
    assert!(!output.is_success());
    assert_eq!(output.report.status(PipelineStage::Scenario), StageStatus::Failed);
}

#[tokio::test(start_paused = true)]
async fn test_cancel_interrupts_stalled_keyframe() {
    let harness = Harness::new();
    let image = Arc::new(StalledKeyframes::new(harness.store.clone()));
    let harness = harness.with_image(image);
    let token = CancellationToken::new();
    let interrupt = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(5)).await;
        interrupt.cancel();
    });

    let started = Instant::now();
    let output = harness
        .pipeline(fast_settings())
        .run_with_cancel(request(2), token)
        .await;

    assert!(started.elapsed() < Duration::from_secs(6), "{:?}", started.elapsed());
    assert_eq!(output.final_uri, format!("{BUCKET}/error.mp4"));
    assert_eq!(output.report.status(PipelineStage::Storyboard), StageStatus::Succeeded);
    assert_eq!(output.report.status(PipelineStage::SceneFanOut), StageStatus::Failed);
    assert_eq!(output.report.status(PipelineStage::Stitch), StageStatus::Skipped);
    assert!(output.report.failed_scenes[0].reason.contains("cancelled"));
    assert_eq!(output.report.skipped_scenes, vec![1]);
}

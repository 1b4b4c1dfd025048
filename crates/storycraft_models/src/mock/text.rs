//! Deterministic text generation.

use async_trait::async_trait;
use regex::Regex;
use serde_json::{Value, json};
use std::sync::LazyLock;
use std::sync::atomic::{AtomicUsize, Ordering};
use storycraft_error::{GenerationError, StorycraftResult};
use storycraft_interface::TextGenerator;

static SCENE_COUNT: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"Generate exactly (\d+)").ok());

/// Text generator answering scenario and storyboard prompts with the lunar
/// astronaut story.
///
/// Scenario prompts (containing a `<pitch>` block) get the scenario wrapped in
/// a markdown fence, the way chat models tend to answer. Storyboard prompts
/// (containing a `<scenario>` block) get exactly as many scenes as they ask for.
#[derive(Debug, Default)]
pub struct MockTextGenerator {
    calls: AtomicUsize,
}

impl MockTextGenerator {
    /// Create a generator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of prompts answered so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextGenerator for MockTextGenerator {
    #[tracing::instrument(skip(self, prompt), fields(prompt_len = prompt.len()))]
    async fn generate(&self, prompt: &str) -> StorycraftResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if prompt.contains("<scenario>") {
            let count = requested_scenes(prompt).ok_or_else(|| {
                GenerationError::unparseable("text", "storyboard prompt has no scene count")
            })?;
            tracing::debug!(count, "Answering storyboard prompt");
            return Ok(json!({ "scenes": storyboard(count) }).to_string());
        }

        if prompt.contains("<pitch>") {
            tracing::debug!("Answering scenario prompt");
            return Ok(format!(
                "Here is your scenario:\n\n```json\n{}\n```\n",
                scenario()
            ));
        }

        Err(GenerationError::unparseable("text", "prompt is neither a scenario nor a storyboard request").into())
    }

    fn model_name(&self) -> &str {
        "mock-text"
    }
}

fn requested_scenes(prompt: &str) -> Option<usize> {
    let regex = SCENE_COUNT.as_ref()?;
    regex
        .captures(prompt)
        .and_then(|captures| captures.get(1))
        .and_then(|count| count.as_str().parse().ok())
}

/// The lunar astronaut scenario, as a scenario generator would return it.
pub fn scenario() -> Value {
    json!({
        "scenario": "On the silent lunar surface, astronaut Eva Rostova finds a single plant glowing inside a shallow crater. When she kneels to study it, the plant answers her helmet light with pulses of its own, and she realizes she is not the first visitor it has spoken to.",
        "genre": "Cinematic",
        "mood": "Inspirational",
        "music": "Slow orchestral swell over airy synth pads, patient and full of wonder.",
        "language": {"name": "English", "code": "en-US"},
        "characters": [{
            "name": "Dr. Eva Rostova",
            "voice": "Calm, measured female voice with a faint Eastern European accent.",
            "description": [
                "A woman in her late 30s with sharp grey eyes and dark hair tied in a tight bun.",
                "She wears a scuffed white and grey spacesuit with a mission patch on the shoulder."
            ]
        }],
        "settings": [
            {
                "name": "Lunar Surface",
                "description": ["Endless grey dust and craters under a black sky, the Earth hanging low and blue on the horizon."]
            },
            {
                "name": "Glowing Crater",
                "description": ["A small sheltered crater lit from within by soft blue and green light."]
            }
        ],
        "props": [{
            "name": "Bioluminescent Plant",
            "description": ["A knee-high plant with crystalline leaves that pulse slowly with cold light."]
        }]
    })
}

/// `count` storyboard scenes cycling through three beats of the story.
pub fn storyboard(count: usize) -> Vec<Value> {
    let beats = [
        (
            "Eva crests a ridge and sees a faint glow in the crater below.",
            "Eva stops mid-stride and turns toward the light.",
            "Slow pan from the horizon down into the crater",
            "Nothing should live here. And yet, something was waiting.",
            "Lunar Surface",
        ),
        (
            "Eva kneels beside the plant, her visor reflecting its light.",
            "Eva reaches out a gloved hand; the plant pulses brighter.",
            "Static close-up on the glove and leaves",
            "It answered me, in the only language it had.",
            "Glowing Crater",
        ),
        (
            "The plant flashes a long pattern while Eva records it.",
            "Light ripples across the crater walls in waves.",
            "Slow pull back to a wide shot",
            "",
            "Glowing Crater",
        ),
    ];

    (0..count)
        .map(|index| {
            let (description, action, camera, voiceover, context) = beats[index % beats.len()];
            json!({
                "imagePrompt": {
                    "Style": "Cinematic, high-contrast, realistic",
                    "Scene": description,
                    "Composition": {"shot_type": "Medium shot", "lighting": "Blue-green glow against black sky"},
                    "Subject": [{"name": "Dr. Eva Rostova"}],
                    "Prop": [{"name": "Bioluminescent Plant"}],
                    "Context": [{"name": context}]
                },
                "videoPrompt": {
                    "Action": action,
                    "Camera_Motion": camera,
                    "Ambiance_Audio": "Suit life support hum and soft radio static",
                    "Dialogue": []
                },
                "description": description,
                "voiceover": voiceover,
                "charactersPresent": ["Dr. Eva Rostova"]
            })
        })
        .collect()
}

//! Prompt text for the generation capabilities.

use serde_json::{Value, json};
use storycraft_core::{Language, RosterEntry, ScenarioBlueprint, Scene, ShotType};

const MUSIC_GENRES: &[&str] = &[
    "Alternative & Punk",
    "Ambient",
    "Children's",
    "Cinematic",
    "Classical",
    "Country & Folk",
    "Dance & Electronic",
    "Hip-Hop & Rap",
    "Holiday",
    "Jazz & Blues",
    "Pop",
    "R&B & Soul",
    "Reggae",
    "Rock",
];

const MOODS: &[&str] = &[
    "Angry",
    "Bright",
    "Calm",
    "Dark",
    "Dramatic",
    "Funky",
    "Happy",
    "Inspirational",
    "Romantic",
    "Sad",
];

fn menu(items: &[&str]) -> String {
    items
        .iter()
        .map(|item| format!("- {item}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Prompt asking for the scenario, roster, genre, mood and music of a pitch.
pub fn scenario_prompt(pitch: &str, style: &str, language: &Language) -> String {
    let name = &language.name;
    let code = &language.code;
    format!(
        r#"You are tasked with generating a creative scenario for a short movie and creating prompts for storyboard illustrations. Follow these instructions carefully:
1. First, you will be given a story pitch. This story pitch will be the foundation for your scenario.

<pitch>
{pitch}
</pitch>

2. Generate a scenario in {name} for a movie based on the story pitch. Stick as close as possible to the pitch. The style of the movie is {style}. Do not include children in your scenario.

3. What Music Genre will best fit this video, pick from:
{genres}

4. What is the mood of this video, pick from:
{moods}

5. Generate a short description of the music, in English only, that will be used in the video. No references to the story, no references to known artists or songs.

6. Format your output as follows:
- First, provide a detailed description of your scenario in {name}.
- Then from this scenario provide a short description of each character in the story inside the characters key.
- Then from this scenario provide a short description of each setting in the story inside the settings key.
- Then, optionally, and only for very important props (products for ads, recurring objects, vehicles), if any, 0 to 2 props max, a short description of each prop important for the story.

Format the response as a JSON object shaped like this:
{{
 "scenario": "[Brief description of your creative scenario based on the given story pitch]",
 "genre": "[Music genre]",
 "mood": "[Mood]",
 "music": "[Short description of the music, no references to the story, known artists or songs]",
 "language": {{"name": "{name}", "code": "{code}"}},
 "characters": [{{"name": "[name]", "voice": "[voice description, one sentence]", "description": ["[in {name}: age, gender, ethnicity, facial features, hair, exact clothing; one affirmative sentence]"]}}],
 "settings": [{{"name": "[name]", "description": ["[in {name}: atmosphere, lighting, materials; one evocative sentence]"]}}],
 "props": [{{"name": "[name]", "description": ["[in {name}: key features that must remain consistent; one sentence]"]}}]
}}

Remember, your goal is to create a compelling and visually interesting story that can be effectively illustrated through a storyboard. Be creative, consistent, and detailed in your scenario and prompts."#,
        genres = menu(MUSIC_GENRES),
        moods = menu(MOODS),
    )
}

fn roster_block(entries: &[RosterEntry]) -> String {
    entries
        .iter()
        .map(|entry| format!("{}\n\n{}", entry.name(), entry.description()))
        .collect::<Vec<_>>()
        .join("\n")
}

fn character_block(entries: &[RosterEntry]) -> String {
    entries
        .iter()
        .map(|entry| {
            format!(
                "Name: {}\nDescription: {}\nVoice Description: {}",
                entry.name(),
                entry.description(),
                entry.voice().as_deref().unwrap_or("")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Prompt asking for exactly `num_scenes` storyboard scenes of a scenario.
pub fn scenes_prompt(blueprint: &ScenarioBlueprint, num_scenes: u32) -> String {
    let language = &blueprint.language().name;
    let style = if blueprint.style().is_empty() {
        "cinematic"
    } else {
        blueprint.style().as_str()
    };
    format!(
        r#"You are tasked with generating creative scenes for a short movie and creating prompts for storyboard illustrations. Follow these instructions carefully:
1. First, you will be given a scenario in {language}. This scenario will be the foundation for your storyboard.

<scenario>
{scenario}
</scenario>

<characters>
{characters}
</characters>

<props>
{props}
</props>

<settings>
{settings}
</settings>

<music>
{music}
</music>

<mood>
{mood}
</mood>

2. Generate exactly {num_scenes}, creative scenes to create a storyboard illustrating the scenario. For each scene, provide a JSON object with the keys: "imagePrompt", "videoPrompt", "description", "voiceover", and "charactersPresent".

3. The `imagePrompt` should be a JSON object for AI image generation of the first frame of the video, in {language}, with the style "{style}". List the characters shown under "Subject" as objects with a "name".

4. The `videoPrompt` should be a JSON object in {language}, focusing on movement and sound within the scene, with the keys "Action", "Camera_Motion" and "Ambiance_Audio".

5. Format your entire output as a single JSON object with one key, "scenes", which contains a list of the {num_scenes} scene objects you generated:
{{
  "scenes": [
    {{
      "imagePrompt": {{ ... }},
      "videoPrompt": {{ ... }},
      "description": "[A scene description explaining what happens]",
      "voiceover": "[A short narrator voiceover text. One full sentence.]",
      "charactersPresent": ["[names of characters visually present in the scene]"]
    }}
  ]
}}

Remember, the number of scenes should be exactly {num_scenes}."#,
        scenario = blueprint.scenario_text(),
        characters = character_block(blueprint.characters()),
        props = roster_block(blueprint.props()),
        settings = roster_block(blueprint.settings()),
        music = blueprint.music_description(),
        mood = blueprint.mood(),
    )
}

/// Structured prompt for a reference image, rendered as JSON text.
pub fn reference_image_prompt(style: &str, shot_type: ShotType, description: &str) -> String {
    render(&json!({
        "style": style,
        "shot_type": shot_type,
        "description": description,
    }))
}

/// The scene's image prompt rendered as JSON text.
pub fn keyframe_prompt(scene: &Scene) -> String {
    render(scene.image_prompt())
}

/// Clip prompt built from the scene's video prompt.
///
/// Generators spell the keys several ways; the first non-empty spelling wins.
pub fn video_prompt(scene: &Scene) -> String {
    let field = |keys: &[&str]| {
        keys.iter()
            .map(|key| scene.video_prompt_field(key))
            .find(|value| !value.is_empty())
            .unwrap_or_default()
    };
    format!(
        "Action: {}\nCamera Motion: {}\nAmbient Audio: {}",
        field(&["Action", "action"]),
        field(&["Camera_Motion", "Camera Motion", "camera_motion"]),
        field(&["Ambiance_Audio", "Ambient_Audio", "Ambient Audio", "ambient_audio"]),
    )
}

fn render(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

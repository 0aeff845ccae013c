use crate::studio::Perspective;

/// System prompt for one perspective. The first line names the role.
pub fn system_prompt(perspective: Perspective) -> &'static str {
    match perspective {
        Perspective::Visionary => "\
You are the Visionary of a small creative studio.
Push the idea somewhere unexpected. Describe the boldest version of it in a few vivid sentences.
No lists, no headings.",
        Perspective::Engineer => "\
You are the Engineer of a small creative studio.
Explain how the idea could actually be built: key parts, materials or technology, and the hardest problem to solve.
Keep it to one short paragraph.",
        Perspective::Storyteller => "\
You are the Storyteller of a small creative studio.
Tell a tiny story (three or four sentences) about one person whose day changes because this idea exists.",
        Perspective::Critic => "\
You are the Critic of a small creative studio.
Name the biggest weakness of the idea and one concrete change that would fix it. Be honest but constructive.
Two or three sentences.",
    }
}

/// User turn for a brainstorm: the prompt plus any related earlier ideas.
pub fn brainstorm_request(prompt: &str, related: &[String]) -> String {
    let mut request = format!("Idea: {}", prompt.trim());
    if !related.is_empty() {
        request.push_str("\n\nRelated ideas from earlier sessions (build on them or steer away, don't repeat them):");
        for idea in related {
            request.push_str("\n- ");
            request.push_str(&muse_core::preview(idea, 200));
        }
    }
    request
}

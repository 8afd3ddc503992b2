//! System prompt construction.

use reelforge_core::project::Project;

/// Build the system prompt for a turn from the project's settings.
pub fn system_prompt(project: &Project) -> String {
    format!(
        "You are a video editing assistant for the project \"{name}\".\n\
         The project renders at {width}x{height} pixels, {fps} frames per second. \
         All timeline positions and durations are expressed in frames on that axis.\n\n\
         You have tools to inspect the project, generate images, videos, and \
         voiceovers, and edit the timeline. Use getProjectState or listAssets \
         before referencing assets you have not seen in this conversation. \
         Image and video generation are asynchronous: the asset appears later, \
         so do not add it to the timeline in the same turn. Voiceover generation \
         is immediate and returns the new audio asset id.\n\n\
         When the work is done, answer the user in plain language. Keep answers \
         short and concrete.",
        name = project.name,
        width = project.width,
        height = project.height,
        fps = project.fps,
    )
}

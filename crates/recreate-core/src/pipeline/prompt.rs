//! Fixed prompts for the describe and generate stages.

/// Instruction sent with the photo to the description provider.
pub const DESCRIBE_PROMPT: &str = "Describe this image with extreme precision and detail. \
     Focus on spatial relationships, colors, textures, lighting, and composition. \
     The description will be used to recreate the image as accurately as possible.";

/// Build the image-generation prompt from a description.
pub fn recreation_prompt(description: &str) -> String {
    format!(
        "Recreate this scene photorealistically: {}. \
         Focus on precise details and maintain accurate proportions. \
         The result should look as close as possible to a real photograph \
         while capturing all the described elements perfectly.",
        description.trim()
    )
}

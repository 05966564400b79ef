//! Canned prompts for the two bot commands.
//!
//! The command surface differs only in which of these it hands to
//! [`DescriptionProvider::describe`](super::DescriptionProvider::describe).

/// Prompt for the plain "create a song from this image" command.
pub const MOOD_PROMPT: &str = "Describe the main mood and atmosphere of this image in 2-3 sentences. Be very concise. DESCRIBE IT IN A WAY THAT IF YOU WERE TALKING TO A ROBOT ABOUT IT, HE WOULD BE ABLE TO CREATE A SONG DESCRIBING AND REPRESENTING THE IMAGE BASED ON YOUR DESCRIPTION";

/// Prompt for the comedic "roast me" command.
pub const ROAST_PROMPT: &str = "Describe this image in a humorous and slightly mocking way. Be witty and clever, but not cruel. Focus on creating a funny, roast-like description that could be turned into a comedic song. Keep it light-hearted and entertaining.";

//! Prompt assembly for description and image-edit calls.

use mirror_core::image::StillImage;
use mirror_core::services::GenerationRequest;
use mirror_core::types::EditTarget;

use crate::messages::{Content, GenerateContentRequest, GenerationConfig, Part};

/// System instruction for every image edit.
pub const EDIT_SYSTEM_INSTRUCTION: &str = "\
You are an expert in realistic photo editing and virtual try-on. \
Your goal is to change one attribute (hairstyle or clothing) of the user image \
while strictly preserving the user's facial identity and body structure.

Rules:
1. Identity preservation is absolute: eyes, nose, mouth, skin texture and all facial \
features must stay exactly as in the original image. Do not beautify or alter the face.
2. Body consistency: do not change body shape, pose or skin tone.
3. For clothing: replace the outfit while keeping the head and pose.
4. For hairstyle: completely replace the hair while keeping face and body intact.
5. Output only the modified image, no text.";

const DESCRIBE_CLOTHING: &str = "\
Describe the main garment in this image in detail, the way a fashion designer would. \
Cover: 1. the exact style and cut (e.g. A-line skirt, slim-fit blazer, drop-shoulder hoodie); \
2. neckline, cuff and hem details; 3. the visual texture of the fabric (velvet, tweed, silk, \
denim, leather, ...); 4. precise colours including tone and sheen; 5. prints, patterns or \
embellishments. Keep it to about 150 words and make it vivid enough for an image model to \
reproduce the garment.";

const DESCRIBE_HAIR: &str = "\
Describe the hairstyle in this image in precise detail, the way a top stylist would. \
Cover: 1. the overall silhouette and the name of the cut (e.g. French curls, wolf cut, \
buzz cut); 2. the exact fringe shape (wispy, curtain, none); 3. the length (ear, shoulder, \
waist); 4. curl size, diameter and direction of texture; 5. the exact hair colour (cool \
brown, blue-black, light ash, ...). The description will be used to transplant this exact \
hairstyle onto another person.";

/// Instruction text sent with a reference image for description.
pub fn describe_instruction(target: EditTarget) -> &'static str {
    match target {
        EditTarget::Clothing => DESCRIBE_CLOTHING,
        EditTarget::Hair => DESCRIBE_HAIR,
    }
}

/// Target-specific edit prompt embedding the description.
pub fn edit_prompt(target: EditTarget, prompt_text: &str, has_reference: bool) -> String {
    match target {
        EditTarget::Clothing => {
            let reference = if has_reference {
                "The second image is the CLOTHING REFERENCE (source).\n"
            } else {
                ""
            };
            format!(
                "The first image is the USER (target).\n\
                 {reference}\n\
                 TARGET DESCRIPTION: {prompt_text}\n\n\
                 TASK: Dress the USER in the described clothing.\n\n\
                 INSTRUCTIONS:\n\
                 - Keep the USER's face, head and pose exactly as they are.\n\
                 - Replace the user's current outfit with the new clothing.\n\
                 - Make the new clothing fit the user's body shape naturally.\n\
                 - Keep photorealistic lighting and shadows."
            )
        }
        EditTarget::Hair => {
            let reference = if has_reference {
                "The second image is the HAIRSTYLE REFERENCE (source).\n"
            } else {
                ""
            };
            format!(
                "The first image is the USER (target).\n\
                 {reference}\n\
                 NEW HAIRSTYLE TARGET: {prompt_text}\n\n\
                 TASK: Realistic hairstyle change.\n\n\
                 CRITICAL INSTRUCTIONS:\n\
                 1. FACE PROTECTION: the face must match the original user image exactly; \
                 do not change expression, age, features or skin texture.\n\
                 2. BODY PROTECTION: keep clothing, neck, shoulders and body shape exactly \
                 as they are unless covered by new long hair.\n\
                 3. REMOVE OLD HAIR: erase the original hair completely; where long hair is \
                 replaced by short hair, regenerate the background it hid.\n\
                 4. APPLY NEW HAIR: generate the new hairstyle ({prompt_text}) blending \
                 naturally with the original forehead and hairline.\n\
                 5. REALISM: photorealistic hair texture matching the original lighting."
            )
        }
    }
}

/// Request asking for a text description of `image`.
pub fn build_describe_request(image: &StillImage, target: EditTarget) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![Content::user(vec![
            Part::image(image),
            Part::text(describe_instruction(target)),
        ])],
        system_instruction: None,
        generation_config: None,
    }
}

/// Request asking for the edited subject image.
///
/// Part order matters: subject first, reference (if any) second, prompt last.
pub fn build_edit_request(request: &GenerationRequest) -> GenerateContentRequest {
    let mut parts = vec![Part::image(&request.subject_image)];
    if let Some(reference) = &request.reference_image {
        parts.push(Part::image(reference));
    }
    parts.push(Part::text(edit_prompt(
        request.target,
        &request.prompt_text,
        request.reference_image.is_some(),
    )));

    GenerateContentRequest {
        contents: vec![Content::user(parts)],
        system_instruction: Some(Content::instruction(EDIT_SYSTEM_INSTRUCTION)),
        generation_config: Some(GenerationConfig::image_output()),
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;

    fn still(byte: u8) -> StillImage {
        StillImage::new("image/jpeg", vec![byte]).unwrap()
    }

    fn request(target: EditTarget, reference: Option<StillImage>) -> GenerationRequest {
        GenerationRequest {
            request_id: Uuid::new_v4(),
            subject_image: still(1),
            reference_image: reference,
            target,
            prompt_text: "a red velvet gown".into(),
        }
    }

    #[test]
    fn edit_request_orders_subject_reference_prompt() {
        let built = build_edit_request(&request(EditTarget::Clothing, Some(still(2))));
        let parts = &built.contents[0].parts;
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0].inline_data.as_ref().unwrap().data, still(1).base64_payload());
        assert_eq!(parts[1].inline_data.as_ref().unwrap().data, still(2).base64_payload());
        let text = parts[2].text.as_deref().unwrap();
        assert!(text.contains("TARGET DESCRIPTION: a red velvet gown"));
        assert!(text.contains("CLOTHING REFERENCE"));
        assert!(built.system_instruction.is_some());
        assert!(built.generation_config.is_some());
    }

    #[test]
    fn edit_request_without_reference_has_two_parts() {
        let built = build_edit_request(&request(EditTarget::Hair, None));
        let parts = &built.contents[0].parts;
        assert_eq!(parts.len(), 2);
        let text = parts[1].text.as_deref().unwrap();
        assert!(text.contains("NEW HAIRSTYLE TARGET: a red velvet gown"));
        assert!(!text.contains("HAIRSTYLE REFERENCE"));
    }

    #[test]
    fn describe_request_uses_target_instruction() {
        let built = build_describe_request(&still(3), EditTarget::Hair);
        let parts = &built.contents[0].parts;
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[1].text.as_deref(), Some(DESCRIBE_HAIR));
        assert!(built.system_instruction.is_none());
        assert_ne!(
            describe_instruction(EditTarget::Clothing),
            describe_instruction(EditTarget::Hair)
        );
    }
}

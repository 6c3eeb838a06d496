//! Two-frame animation strips for character sprites.
//!
//! Each character sheet holds one animation frame. Cells with the same name
//! across sheets are the frames of one sprite and are laid side by side into a
//! double-width image: lower frame number on the left.

use std::collections::BTreeMap;

use image::{imageops, RgbaImage};

use crate::sprite::{NamedSprite, SpriteCandidate};

/// A group that could not be turned into a strip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameAnomaly {
    pub name: String,
    pub frames: usize,
}

/// Result of combining candidate frames.
#[derive(Debug, Default)]
pub struct Combined {
    /// Strips in name order.
    pub sprites: Vec<NamedSprite>,
    /// Groups with more than two frames, dropped.
    pub anomalies: Vec<FrameAnomaly>,
}

/// Group frames by sprite name, ordered by name.
///
/// Frames within a group are sorted by frame number; candidates without a
/// frame count as frame 0.
pub fn group_frames(candidates: Vec<SpriteCandidate>) -> BTreeMap<String, Vec<(u32, RgbaImage)>> {
    let mut groups: BTreeMap<String, Vec<(u32, RgbaImage)>> = BTreeMap::new();
    for candidate in candidates {
        groups
            .entry(candidate.name)
            .or_default()
            .push((candidate.frame.unwrap_or(0), candidate.image));
    }
    for frames in groups.values_mut() {
        frames.sort_by_key(|(frame, _)| *frame);
    }
    groups
}

/// Lay `left` and `right` side by side on a `2 * cell_size` x `cell_size` canvas.
pub fn strip(left: &RgbaImage, right: &RgbaImage, cell_size: u32) -> RgbaImage {
    let mut canvas = RgbaImage::new(cell_size * 2, cell_size);
    imageops::replace(&mut canvas, left, 0, 0);
    imageops::replace(&mut canvas, right, cell_size as i64, 0);
    canvas
}

/// Build one strip per group.
///
/// Two frames fill the left and right halves; a lone frame fills both.
pub fn combine_frames(candidates: Vec<SpriteCandidate>, cell_size: u32) -> Combined {
    let mut combined = Combined::default();

    for (name, frames) in group_frames(candidates) {
        let image = match frames.as_slice() {
            [(_, only)] => strip(only, only, cell_size),
            [(_, first), (_, second)] => strip(first, second, cell_size),
            _ => {
                combined.anomalies.push(FrameAnomaly {
                    name,
                    frames: frames.len(),
                });
                continue;
            }
        };
        combined.sprites.push(NamedSprite::new(name, image));
    }

    combined
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use pretty_assertions::assert_eq;

    fn frame(name: &str, frame: u32, colour: [u8; 4]) -> SpriteCandidate {
        SpriteCandidate::new(name, RgbaImage::from_pixel(16, 16, Rgba(colour))).with_frame(frame)
    }

    fn half(img: &RgbaImage, right: bool) -> RgbaImage {
        let x = if right { 16 } else { 0 };
        imageops::crop_imm(img, x, 0, 16, 16).to_image()
    }

    #[test]
    fn test_two_frames_left_and_right() {
        let a = [255, 0, 0, 255];
        let b = [0, 0, 255, 255];
        // Frame 1 arrives first; sorting puts frame 0 on the left
        let combined = combine_frames(vec![frame("rat-0", 1, b), frame("rat-0", 0, a)], 16);

        assert_eq!(combined.sprites.len(), 1);
        let sprite = &combined.sprites[0];
        assert_eq!(sprite.image.dimensions(), (32, 16));
        assert_eq!(half(&sprite.image, false), RgbaImage::from_pixel(16, 16, Rgba(a)));
        assert_eq!(half(&sprite.image, true), RgbaImage::from_pixel(16, 16, Rgba(b)));
    }

    #[test]
    fn test_single_frame_mirrored() {
        let mut image = RgbaImage::from_pixel(16, 16, Rgba([0, 0, 0, 0]));
        image.put_pixel(2, 5, Rgba([9, 9, 9, 255]));
        let candidate = SpriteCandidate::new("ghost-3", image.clone()).with_frame(0);

        let combined = combine_frames(vec![candidate], 16);
        let sprite = &combined.sprites[0];
        assert_eq!(half(&sprite.image, false), image);
        assert_eq!(half(&sprite.image, true), image);
    }

    #[test]
    fn test_groups_sorted_by_name() {
        let c = [1, 1, 1, 255];
        let combined = combine_frames(
            vec![frame("rodent-2", 0, c), frame("avian-0", 0, c), frame("rodent-10", 0, c)],
            16,
        );
        let names: Vec<_> = combined.sprites.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["avian-0", "rodent-10", "rodent-2"]);
    }

    #[test]
    fn test_three_frames_reported_and_dropped() {
        let c = [1, 1, 1, 255];
        let combined = combine_frames(
            vec![frame("imp-0", 0, c), frame("imp-0", 1, c), frame("imp-0", 2, c), frame("imp-1", 0, c)],
            16,
        );
        assert_eq!(combined.sprites.len(), 1);
        assert_eq!(combined.sprites[0].name, "imp-1");
        assert_eq!(
            combined.anomalies,
            vec![FrameAnomaly { name: "imp-0".to_string(), frames: 3 }]
        );
    }
}

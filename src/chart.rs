// Bar chart rendering for genome rankings
use crate::ranking::Ranking;
use ab_glyph::{FontVec, PxScale};
use anyhow::{Context, Result};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_text_mut, text_size};
use imageproc::rect::Rect;
use std::path::Path;

const WIDTH: u32 = 1000;
const MARGIN_TOP: u32 = 60;
const MARGIN_BOTTOM: u32 = 30;
const LABEL_AREA: u32 = 320;
const COUNT_AREA: u32 = 90;
const ROW_HEIGHT: u32 = 28;
const BAR_HEIGHT: u32 = 18;

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const BAR_COLOR: Rgb<u8> = Rgb([70, 130, 180]);
const TEXT_COLOR: Rgb<u8> = Rgb([30, 30, 30]);
const AXIS_COLOR: Rgb<u8> = Rgb([160, 160, 160]);

/// Render the top `k` genomes as a horizontal bar chart. Genome names are
/// displayed with underscores as spaces. Text is only drawn when a font is
/// supplied; bar geometry does not depend on it.
pub fn render(ranking: &Ranking, title: &str, k: usize, font: Option<&FontVec>) -> RgbImage {
    let entries = ranking.top(k);
    let rows = entries.len() as u32;
    let height = MARGIN_TOP + rows * ROW_HEIGHT + MARGIN_BOTTOM;
    let mut image = RgbImage::from_pixel(WIDTH, height, BACKGROUND);

    let bar_area = WIDTH - LABEL_AREA - COUNT_AREA;
    let max_count = entries.first().map_or(1, |(_, count)| *count).max(1);

    // axis separating labels from bars
    draw_filled_rect_mut(
        &mut image,
        Rect::at(LABEL_AREA as i32 - 1, MARGIN_TOP as i32 - 4)
            .of_size(1, rows * ROW_HEIGHT + 8),
        AXIS_COLOR,
    );

    let label_scale = PxScale::from(16.0);
    let title_scale = PxScale::from(20.0);
    if let Some(font) = font {
        draw_text_mut(&mut image, TEXT_COLOR, 10, 18, title_scale, font, title);
    }

    for (row, (genome, count)) in entries.iter().enumerate() {
        let y = MARGIN_TOP + row as u32 * ROW_HEIGHT;
        let bar_width = ((*count as f64 / max_count as f64) * bar_area as f64) as u32;
        if bar_width > 0 {
            draw_filled_rect_mut(
                &mut image,
                Rect::at(LABEL_AREA as i32, y as i32).of_size(bar_width, BAR_HEIGHT),
                BAR_COLOR,
            );
        }
        if let Some(font) = font {
            let label = genome.replace('_', " ");
            let text_y = y as i32 + (BAR_HEIGHT as i32 - 16) / 2;
            let (label_width, _) = text_size(label_scale, font, &label);
            let label_x = (LABEL_AREA as i32 - 10 - label_width as i32).max(0);
            draw_text_mut(&mut image, TEXT_COLOR, label_x, text_y, label_scale, font, &label);

            let count_text = count.to_string();
            let count_x = LABEL_AREA as i32 + bar_width as i32 + 6;
            draw_text_mut(
                &mut image,
                TEXT_COLOR,
                count_x,
                text_y,
                label_scale,
                font,
                &count_text,
            );
        }
    }

    image
}

/// Render once and encode to every requested path; the format is chosen by
/// each path's extension (png, jpg).
pub fn write(ranking: &Ranking, title: &str, k: usize, paths: &[&Path]) -> Result<()> {
    let font = load_font();
    if font.is_none() {
        log::warn!("no TrueType font found; charts are rendered without labels");
    }
    let image = render(ranking, title, k, font.as_ref());
    for path in paths {
        image
            .save(path)
            .with_context(|| format!("failed to write chart {}", path.display()))?;
        log::info!("wrote chart {}", path.display());
    }
    Ok(())
}

/// Locate a usable TrueType font. `GENORANK_FONT` takes precedence over a
/// short list of common system locations.
fn load_font() -> Option<FontVec> {
    let mut candidates: Vec<String> = Vec::new();
    if let Ok(path) = std::env::var("GENORANK_FONT") {
        candidates.push(path);
    }
    for path in [
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
        "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
        "/System/Library/Fonts/Supplemental/Arial.ttf",
    ] {
        candidates.push(path.to_string());
    }

    for candidate in candidates {
        if let Ok(bytes) = std::fs::read(&candidate) {
            match FontVec::try_from_vec(bytes) {
                Ok(font) => {
                    log::debug!("using font {candidate}");
                    return Some(font);
                }
                Err(err) => log::warn!("ignoring unusable font {candidate}: {err}"),
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ranking_of(counts: &[(&str, u64)]) -> Ranking {
        let mut ranking = Ranking::new();
        for (genome, count) in counts {
            for _ in 0..*count {
                ranking.add(genome.to_string());
            }
        }
        ranking
    }

    #[test]
    fn test_canvas_height_tracks_row_count() {
        let ranking = ranking_of(&[("A", 3), ("B", 2), ("C", 1)]);
        let image = render(&ranking, "test", 2, None);
        assert_eq!(image.width(), WIDTH);
        assert_eq!(image.height(), MARGIN_TOP + 2 * ROW_HEIGHT + MARGIN_BOTTOM);
    }

    #[test]
    fn test_top_genome_bar_spans_the_bar_area() {
        let ranking = ranking_of(&[("A", 10), ("B", 5)]);
        let image = render(&ranking, "test", 20, None);

        let y = MARGIN_TOP + BAR_HEIGHT / 2;
        let far_end = WIDTH - COUNT_AREA - 2;
        assert_eq!(*image.get_pixel(far_end, y), BAR_COLOR);

        // second bar is half as long, so its far end is background
        let y2 = MARGIN_TOP + ROW_HEIGHT + BAR_HEIGHT / 2;
        assert_eq!(*image.get_pixel(far_end, y2), BACKGROUND);
        let half = LABEL_AREA + (WIDTH - LABEL_AREA - COUNT_AREA) / 2;
        assert_eq!(*image.get_pixel(half - 2, y2), BAR_COLOR);
    }

    #[test]
    fn test_empty_ranking_renders_without_bars() {
        let image = render(&Ranking::new(), "empty", 20, None);
        assert_eq!(image.height(), MARGIN_TOP + MARGIN_BOTTOM);
    }

    #[test]
    fn test_writes_png_and_jpeg() {
        let ranking = ranking_of(&[("Genome_A", 4), ("Genome_B", 1)]);
        let dir = std::env::temp_dir();
        let png = dir.join(format!("genorank_chart_{}.png", std::process::id()));
        let jpg = dir.join(format!("genorank_chart_{}.jpg", std::process::id()));
        write(&ranking, "test", 20, &[&png, &jpg]).unwrap();
        assert!(png.exists());
        assert!(jpg.exists());
        std::fs::remove_file(&png).ok();
        std::fs::remove_file(&jpg).ok();
    }
}

use crate::shared::frame::Frame;

/// Pixel-level annotation primitives for detector output frames.
///
/// Coordinates outside the frame are clipped, never panicked on, since
/// landmark extents can land on the frame border.
pub fn draw_filled_circle(frame: &mut Frame, cx: i32, cy: i32, radius: i32, color: [u8; 3]) {
    let (w, h) = (frame.width() as i32, frame.height() as i32);
    let r2 = radius * radius;
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            if dx * dx + dy * dy > r2 {
                continue;
            }
            let (x, y) = (cx + dx, cy + dy);
            if x >= 0 && x < w && y >= 0 && y < h {
                put_pixel(frame, x as usize, y as usize, color);
            }
        }
    }
}

/// Rectangle outline with the given border thickness (grows inward).
pub fn draw_rect(
    frame: &mut Frame,
    x: i32,
    y: i32,
    width: i32,
    height: i32,
    thickness: i32,
    color: [u8; 3],
) {
    if width <= 0 || height <= 0 {
        return;
    }
    let (fw, fh) = (frame.width() as i32, frame.height() as i32);
    for py in y..y + height {
        if py < 0 || py >= fh {
            continue;
        }
        for px in x..x + width {
            if px < 0 || px >= fw {
                continue;
            }
            let on_border = px - x < thickness
                || (x + width - 1 - px) < thickness
                || py - y < thickness
                || (y + height - 1 - py) < thickness;
            if on_border {
                put_pixel(frame, px as usize, py as usize, color);
            }
        }
    }
}

fn put_pixel(frame: &mut Frame, x: usize, y: usize, color: [u8; 3]) {
    let channels = frame.channels() as usize;
    let idx = (y * frame.width() as usize + x) * channels;
    let data = frame.data_mut();
    data[idx] = color[0];
    data[idx + 1] = color[1];
    data[idx + 2] = color[2];
}

use image::{Rgb, RgbImage};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::env;

fn main() -> anyhow::Result<()> {
    let out = env::args().nth(1).unwrap_or_else(|| "synthetic_page.png".to_string());

    // A4-ish page at 100 dpi
    let mut img = RgbImage::from_pixel(827, 1169, Rgb([250, 248, 240]));
    let mut rng = StdRng::seed_from_u64(42);

    // Colorful "painting" made of 20px tiles
    for ty in (150..450).step_by(20) {
        for tx in (120..520).step_by(20) {
            let color = Rgb([
                rng.gen_range(20..=200u8),
                rng.gen_range(20..=200u8),
                rng.gen_range(20..=200u8),
            ]);
            for y in ty..ty + 20 {
                for x in tx..tx + 20 {
                    img.put_pixel(x, y, color);
                }
            }
        }
    }

    // Flat gray box that should not be detected
    for y in 600..800 {
        for x in 200..600 {
            img.put_pixel(x, y, Rgb([128, 128, 128]));
        }
    }

    // A few lines of "text"
    for line in 0..8u32 {
        let y0 = 900 + line * 24;
        for x in (100..720).step_by(9) {
            if rng.gen_range(0..5) == 0 {
                continue;
            }
            for y in y0..y0 + 10 {
                for dx in 0..6 {
                    img.put_pixel(x + dx, y, Rgb([30, 30, 30]));
                }
            }
        }
    }

    img.save(&out)?;
    println!("Created {} (827x1169, one painting, one gray box, some text)", out);
    Ok(())
}

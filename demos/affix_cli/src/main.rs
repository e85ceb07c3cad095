use argh::FromArgs;
use std::path::PathBuf;

use affix::composite::{CompositeOptions, Locale, Point, Session};
use affix::imgproc::resize::ResizeBackend;

#[derive(FromArgs)]
/// Paste a poster onto a kiosk photograph along three picked corners
struct Args {
    /// path to the poster image
    #[argh(option, short = 'p')]
    poster: PathBuf,

    /// path to the kiosk image
    #[argh(option, short = 'k')]
    kiosk: PathBuf,

    /// a corner as `x,y`, given three times in any order
    #[argh(option, short = 'c', from_str_fn(parse_point))]
    corner: Vec<Point>,

    /// where to write the result, `.png` keeps alpha
    #[argh(option, short = 'o')]
    output: PathBuf,

    /// jpeg quality from 0 to 100
    #[argh(option, default = "95")]
    quality: u8,

    /// print status messages in korean
    #[argh(switch)]
    korean: bool,

    /// resize with fast_image_resize instead of the built-in kernels
    #[argh(switch)]
    fast_resize: bool,
}

fn parse_point(value: &str) -> Result<Point, String> {
    let (x, y) = value
        .split_once(',')
        .ok_or_else(|| format!("expected `x,y`, got `{value}`"))?;
    let parse = |s: &str| s.trim().parse::<i32>().map_err(|e| format!("{s}: {e}"));
    Ok(Point::new(parse(x)?, parse(y)?))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    let options = CompositeOptions {
        locale: if args.korean {
            Locale::Korean
        } else {
            Locale::English
        },
        resize_backend: if args.fast_resize {
            ResizeBackend::Fast
        } else {
            ResizeBackend::Native
        },
        ..Default::default()
    };

    let mut sink = |line: &str| println!("{line}");

    let mut session = Session::with_options(options).with_jpeg_quality(args.quality);
    session.set_poster(args.poster);
    session.set_kiosk(args.kiosk);
    for corner in args.corner {
        if !session.push_point(corner, &mut sink) {
            log::warn!("ignoring extra corner {corner}");
        }
    }

    if session.process(&mut sink)?.is_none() {
        return Err("nothing was composited".into());
    }

    session.save(&args.output, &mut sink)?;

    Ok(())
}

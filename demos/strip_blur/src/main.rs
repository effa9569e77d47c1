use argh::FromArgs;

use gauss::image::{ImageSize, PackedRgbImage};
use gauss::imgproc::filter::{binomial_blur, BinomialBlurConfig};
use gauss::imgproc::parallel::ExecutionStrategy;

#[derive(FromArgs)]
/// Blur a synthetic image in strips and compare it with the single strip result
struct Args {
    /// the width of the image
    #[argh(option, default = "1920")]
    width: usize,

    /// the height of the image
    #[argh(option, default = "1080")]
    height: usize,

    /// the odd size of the binomial kernel
    #[argh(option, short = 'k', default = "5")]
    kernel_size: usize,

    /// the number of strips
    #[argh(option, short = 's', default = "4")]
    strips: usize,

    /// the number of blur iterations
    #[argh(option, short = 'n', default = "1")]
    iterations: usize,

    /// run on a local pool with this many threads
    #[argh(option)]
    threads: Option<usize>,

    /// run the strips one after another
    #[argh(switch)]
    serial: bool,
}

fn checkerboard(size: ImageSize, cell: usize) -> Result<PackedRgbImage, Box<dyn std::error::Error>> {
    let mut image = PackedRgbImage::from_size_val(size, [0, 0, 0]);
    for y in 0..size.height {
        for x in 0..size.width {
            let on = ((x / cell) + (y / cell)) % 2 == 0;
            let px = if on {
                [255, (x % 256) as u8, (y % 256) as u8]
            } else {
                [0, 64, 128]
            };
            image.set_pixel(x, y, px)?;
        }
    }
    Ok(image)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    let strategy = match (args.serial, args.threads) {
        (true, _) => ExecutionStrategy::Serial,
        (false, Some(n)) => ExecutionStrategy::Fixed(n),
        (false, None) => ExecutionStrategy::ParallelStrips,
    };

    let size = ImageSize {
        width: args.width,
        height: args.height,
    };
    let src = checkerboard(size, 16)?;

    let config = BinomialBlurConfig::new(args.kernel_size)
        .with_num_strips(args.strips)
        .with_iterations(args.iterations)
        .with_strategy(strategy);

    let mut blurred = src.clone();
    let start = std::time::Instant::now();
    binomial_blur(&mut blurred, &config)?;
    let elapsed = start.elapsed();

    let reference_config = BinomialBlurConfig::new(args.kernel_size).with_iterations(args.iterations);
    let mut reference = src;
    binomial_blur(&mut reference, &reference_config)?;

    log::info!("config: {:?}", config);
    println!("blurred {} in {:?}", size, elapsed);
    println!("matches single strip: {}", blurred == reference);

    Ok(())
}

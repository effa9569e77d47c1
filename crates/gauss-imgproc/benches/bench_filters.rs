use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use gauss_image::PackedRgbImage;
use gauss_imgproc::filter::{binomial_blur, BinomialBlurConfig};
use gauss_imgproc::parallel::ExecutionStrategy;

fn bench_filters(c: &mut Criterion) {
    let mut group = c.benchmark_group("Binomial Blur");

    for (width, height) in [(256, 224), (512, 448), (1024, 896)].iter() {
        for kernel_size in [3, 5, 7, 9, 11, 17].iter() {
            group.throughput(criterion::Throughput::Elements(
                (*width * *height * *kernel_size) as u64,
            ));

            let parameter_string = format!("{}x{}x{}", width, height, kernel_size);

            let image = PackedRgbImage::from_size_val([*width, *height].into(), [128, 64, 32]);

            group.bench_with_input(
                BenchmarkId::new("binomial_blur_serial", &parameter_string),
                &image,
                |b, i| {
                    let mut dst = i.clone();
                    let config = BinomialBlurConfig::new(*kernel_size);
                    b.iter(|| black_box(binomial_blur(&mut dst, &config)))
                },
            );

            group.bench_with_input(
                BenchmarkId::new("binomial_blur_parallel_strips", &parameter_string),
                &image,
                |b, i| {
                    let mut dst = i.clone();
                    let config = BinomialBlurConfig::new(*kernel_size)
                        .with_num_strips(rayon::current_num_threads())
                        .with_strategy(ExecutionStrategy::ParallelStrips);
                    b.iter(|| black_box(binomial_blur(&mut dst, &config)))
                },
            );
        }
    }

    group.finish();
}

criterion_group!(benches, bench_filters);
criterion_main!(benches);

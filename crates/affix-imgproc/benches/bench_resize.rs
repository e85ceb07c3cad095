use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use affix_image::{Image, ImageSize};
use affix_imgproc::{interpolation::InterpolationMode, resize};

fn bench_resize(c: &mut Criterion) {
    let mut group = c.benchmark_group("Resize");

    for (width, height) in [(256, 224), (512, 448), (1024, 896)].iter() {
        group.throughput(criterion::Throughput::Elements((*width * *height) as u64));

        let parameter_string = format!("{width}x{height}");

        let image_size = ImageSize {
            width: *width,
            height: *height,
        };
        let image = Image::<u8, 3>::new(image_size, vec![128u8; width * height * 3]).unwrap();
        let new_size = ImageSize {
            width: width / 3,
            height: height / 3,
        };

        for mode in [InterpolationMode::Area, InterpolationMode::Bilinear] {
            group.bench_with_input(
                BenchmarkId::new(format!("resize_u8_{mode:?}"), &parameter_string),
                &image,
                |b, i| b.iter(|| resize::resize_u8(black_box(i), new_size, mode)),
            );
        }

        let mut dst = Image::<u8, 3>::from_size_val(new_size, 0).unwrap();
        group.bench_with_input(
            BenchmarkId::new("resize_fast_area", &parameter_string),
            &image,
            |b, i| b.iter(|| resize::resize_fast(black_box(i), &mut dst, InterpolationMode::Area)),
        );
    }
    group.finish();
}

criterion_group!(benches, bench_resize);
criterion_main!(benches);

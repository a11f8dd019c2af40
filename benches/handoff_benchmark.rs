//! Hand-off queue benchmark: Measure send/receive pairing cost.
//!
//! Target: < 1µs per buffered send + receive on one thread

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use sketchflow::actor::{HandoffQueue, OverflowPolicy, QueueConfig};
use sketchflow::{PointerEvent, Point};
use std::sync::Arc;
use std::thread;

fn send_then_receive(c: &mut Criterion) {
    let queue: HandoffQueue<PointerEvent> = HandoffQueue::new();

    c.bench_function("handoff_send_then_receive", |b| {
        b.iter(|| {
            let _ = queue.send(black_box(PointerEvent::motion(1.0, 2.0)));
            queue.receive().ok().and_then(|pending| pending.try_take())
        })
    });
}

fn receive_then_send(c: &mut Criterion) {
    let queue: HandoffQueue<PointerEvent> = HandoffQueue::new();

    c.bench_function("handoff_receive_then_send", |b| {
        b.iter(|| {
            let pending = queue.receive().ok();
            let _ = queue.send(black_box(PointerEvent::motion(1.0, 2.0)));
            pending.and_then(|pending| pending.try_take())
        })
    });
}

fn overflow_drop_oldest(c: &mut Criterion) {
    let mut group = c.benchmark_group("handoff_overflow");

    for capacity in [16usize, 256, 1024] {
        let queue: HandoffQueue<Point> = HandoffQueue::with_config(QueueConfig {
            capacity,
            overflow: OverflowPolicy::DropOldest,
        });
        for i in 0..capacity {
            let _ = queue.send(Point::new(i as f32, 0.0));
        }

        group.bench_with_input(BenchmarkId::new("drop_oldest", capacity), &queue, |b, queue| {
            b.iter(|| queue.send(black_box(Point::new(0.0, 0.0))))
        });
    }

    group.finish();
}

fn cross_thread_burst(c: &mut Criterion) {
    c.bench_function("handoff_cross_thread_1000", |b| {
        b.iter(|| {
            let queue = Arc::new(HandoffQueue::<u32>::new());
            let producer = {
                let queue = Arc::clone(&queue);
                thread::spawn(move || {
                    for i in 0..1000 {
                        let _ = queue.send(i);
                    }
                })
            };
            let mut sum = 0u64;
            for _ in 0..1000 {
                if let Ok(pending) = queue.receive() {
                    sum += u64::from(pending.wait().unwrap_or(0));
                }
            }
            let _ = producer.join();
            sum
        })
    });
}

criterion_group!(
    benches,
    send_then_receive,
    receive_then_send,
    overflow_drop_oldest,
    cross_thread_burst,
);
criterion_main!(benches);

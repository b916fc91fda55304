//! Quadrature encoder task
//!
//! Decodes every edge on the A/B pins into the shared encoder count.

use defmt::*;
use embassy_futures::select::select;
use embassy_rp::gpio::Input;

use slidelink_hal_rp2040::inputs::add_encoder_count;
use slidelink_hal_rp2040::QuadratureDecoder;

#[embassy_executor::task]
pub async fn encoder_task(mut a: Input<'static>, mut b: Input<'static>) {
    info!("Encoder task started");

    let mut decoder = QuadratureDecoder::new(a.is_high(), b.is_high());

    loop {
        select(a.wait_for_any_edge(), b.wait_for_any_edge()).await;
        add_encoder_count(decoder.update(a.is_high(), b.is_high()));
    }
}

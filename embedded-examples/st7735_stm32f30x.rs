//! Full example code for setting up an ST7735 display. This runs on an STM32F303RE, using a
//! common 1.8" 128x160 "red tab" module connected to SPI1, PA8 for D/C, and PA9 for /RESET. Chip
//! select is tied low on the module.

#![deny(unsafe_code)]
#![no_main]
#![no_std]

extern crate cortex_m;
extern crate embedded_hal as hal_api;
extern crate stm32f30x;
extern crate stm32f30x_hal as hal;
#[macro_use]
extern crate cortex_m_rt;
extern crate dispctl;
extern crate panic_abort;

use cortex_m::asm;
use cortex_m_rt::ExceptionFrame;
use dispctl::color::{BLACK, BLUE, CYAN, GREEN, WHITE, YELLOW};
use dispctl::{Config, Display, PixelCoord, SpiInterface, St7735};
use hal::prelude::*;
use hal::spi;

entry!(main);

exception!(*, default_handler);
exception!(HardFault, hard_fault);

fn hard_fault(_ef: &ExceptionFrame) -> ! {
    asm::bkpt();
    loop {}
}

fn default_handler(_irqn: i16) {
    loop {}
}

fn main() -> ! {
    // Get peripherals and set up RCC.
    let cp = cortex_m::Peripherals::take().unwrap();
    let dp = stm32f30x::Peripherals::take().unwrap();

    let mut flash = dp.FLASH.constrain();
    let mut rcc = dp.RCC.constrain();
    let clocks = rcc.cfgr.freeze(&mut flash.acr);
    let mut delay = hal::delay::Delay::new(cp.SYST, clocks);

    // Get GPIO A where the display is connected.
    let mut gpioa = dp.GPIOA.split(&mut rcc.ahb);

    // Set up SPI1, which is Alternate Function 5 for GPIOs PA5,6,7.
    let disp_sck = gpioa.pa5.into_af5(&mut gpioa.moder, &mut gpioa.afrl);
    let disp_miso = gpioa.pa6.into_af5(&mut gpioa.moder, &mut gpioa.afrl);
    let disp_mosi = gpioa.pa7.into_af5(&mut gpioa.moder, &mut gpioa.afrl);

    let disp_spi = spi::Spi::spi1(
        dp.SPI1,
        (disp_sck, disp_miso, disp_mosi),
        hal_api::spi::Mode {
            polarity: hal_api::spi::Polarity::IdleLow,
            phase: hal_api::spi::Phase::CaptureOnFirstTransition,
        },
        8.mhz(),
        clocks,
        &mut rcc.apb2,
    );

    // PA8 will be the D/C push-pull output.
    let disp_dc = gpioa
        .pa8
        .into_push_pull_output(&mut gpioa.moder, &mut gpioa.otyper);

    // PA9 is the display's /RESET pin, pulsed by `Display::init`.
    let mut disp_rst = gpioa
        .pa9
        .into_push_pull_output(&mut gpioa.moder, &mut gpioa.otyper);

    let mut disp = Display::new(
        SpiInterface::new(disp_spi, disp_dc),
        St7735::new(Config::new()),
        PixelCoord(128, 160),
    );
    disp.init(&mut disp_rst, &mut delay).unwrap();

    // A status screen: title bar, a few formatted lines, and a footer badge.
    disp.clear().unwrap();
    disp.fill_rect(0, 0, 128, 15, BLUE).unwrap();
    disp.draw_string(25, 4, "SYSTEM STATUS", WHITE, BLUE, 1)
        .unwrap();

    disp.set_text_style(WHITE, BLACK, 1);
    disp.set_cursor(5, 25);
    disp.print(format_args!("Temperature: {:.1}C", 23.5f32))
        .unwrap();
    disp.set_text_style(YELLOW, BLACK, 1);
    disp.set_cursor(5, 40);
    disp.print(format_args!("Humidity: {}%", 65)).unwrap();
    disp.set_text_style(CYAN, BLACK, 1);
    disp.set_cursor(5, 55);
    disp.print(format_args!("Count: {:04}", 1234)).unwrap();

    disp.rect(0, 140, 128, 20, GREEN).unwrap();
    disp.draw_string(22, 146, "ALL SYSTEMS OK", GREEN, BLACK, 1)
        .unwrap();

    // Anything past the panel edge is clipped, so a big circle can hang off the side.
    disp.draw_circle(120, 100, 20, CYAN).unwrap();
    disp.fill_circle(64, 100, 10, YELLOW).unwrap();

    loop {
        asm::wfi();
    }
}

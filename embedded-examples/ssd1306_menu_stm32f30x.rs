//! A small menu UI and an animation on a 128x64 SSD1306 module. This runs on an STM32F303RE with
//! the module on I2C1 (PB6 SCL, PB7 SDA) and three buttons on PC0 (up), PC1 (down) and PC2
//! (select), active low. The module has no reset line broken out.
//!
//! All UI state lives in `App`; the driver only ever sees drawing calls.

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
use dispctl::interface::i2c::DEFAULT_ADDRESS;
use dispctl::{BinaryColor, Display, DisplayInterface, Error, I2cInterface, MonoConfig};
use dispctl::{NoResetPin, PixelCoord, Ssd1306};
use hal::i2c::I2c;
use hal::prelude::*;
use hal_api::blocking::delay::DelayMs;
use hal_api::digital::v2::InputPin;

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

const ITEMS_PER_PAGE: usize = 4;

/// What selecting a menu entry does.
#[derive(Clone, Copy, PartialEq)]
enum MenuAction {
    Open(Screen),
    Back,
    BrightnessUp,
    BrightnessDown,
    Invert,
    Animate,
    Nothing,
}

#[derive(Clone, Copy, PartialEq)]
enum Screen {
    Main,
    Display,
    About,
}

fn items(screen: Screen) -> &'static [(&'static str, MenuAction)] {
    match screen {
        Screen::Main => &[
            ("Display", MenuAction::Open(Screen::Display)),
            ("Animation", MenuAction::Animate),
            ("About", MenuAction::Open(Screen::About)),
        ],
        Screen::Display => &[
            ("Brightness +", MenuAction::BrightnessUp),
            ("Brightness -", MenuAction::BrightnessDown),
            ("Invert", MenuAction::Invert),
            ("Back", MenuAction::Back),
        ],
        Screen::About => &[
            ("dispctl demo", MenuAction::Nothing),
            ("SSD1306 128x64", MenuAction::Nothing),
            ("I2C @ 0x3C", MenuAction::Nothing),
            ("Back", MenuAction::Back),
        ],
    }
}

fn title(screen: Screen) -> &'static str {
    match screen {
        Screen::Main => "Main Menu",
        Screen::Display => "Display",
        Screen::About => "About",
    }
}

/// Menu navigation state.
struct Menu {
    screen: Screen,
    selection: usize,
    scroll: usize,
}

impl Menu {
    fn up(&mut self) {
        if self.selection > 0 {
            self.selection -= 1;
            if self.selection < self.scroll {
                self.scroll = self.selection;
            }
        }
    }

    fn down(&mut self) {
        if self.selection + 1 < items(self.screen).len() {
            self.selection += 1;
            if self.selection >= self.scroll + ITEMS_PER_PAGE {
                self.scroll = self.selection + 1 - ITEMS_PER_PAGE;
            }
        }
    }

    fn selected(&self) -> MenuAction {
        items(self.screen)[self.selection].1
    }

    fn open(&mut self, screen: Screen) {
        self.screen = screen;
        self.selection = 0;
        self.scroll = 0;
    }
}

/// A ball bouncing around the panel.
struct Bounce {
    pos: PixelCoord,
    vel: PixelCoord,
    frames_left: u16,
}

impl Bounce {
    const RADIUS: i32 = 4;

    fn step(&mut self, size: PixelCoord) {
        let r = Self::RADIUS;
        self.pos = PixelCoord(self.pos.0 + self.vel.0, self.pos.1 + self.vel.1);
        if self.pos.0 - r <= 0 || self.pos.0 + r >= size.0 - 1 {
            self.vel.0 = -self.vel.0;
        }
        if self.pos.1 - r <= 0 || self.pos.1 + r >= size.1 - 1 {
            self.vel.1 = -self.vel.1;
        }
        self.frames_left = self.frames_left.saturating_sub(1);
    }
}

struct App {
    menu: Menu,
    contrast: u8,
    inverted: bool,
    bounce: Option<Bounce>,
}

fn draw_menu<DI>(disp: &mut Display<DI, Ssd1306>, app: &App) -> Result<(), Error<DI::Error>>
where
    DI: DisplayInterface,
{
    let (on, off) = (BinaryColor::On, BinaryColor::Off);
    let menu = &app.menu;
    let entries = items(menu.screen);
    disp.clear()?;
    disp.draw_string(0, 2, title(menu.screen), on, off, 1)?;
    disp.set_text_style(on, off, 1);
    disp.set_cursor(98, 2);
    disp.print(format_args!("{}/{}", menu.selection + 1, entries.len()))?;
    disp.line(0, 12, 127, 12, on)?;

    for (row, (label, _)) in entries
        .iter()
        .enumerate()
        .skip(menu.scroll)
        .take(ITEMS_PER_PAGE)
    {
        let y = 16 + (row - menu.scroll) as i32 * 12;
        if row == menu.selection {
            disp.fill_rect(0, y - 1, 128, 10, on)?;
            disp.draw_string(2, y, label, off, on, 1)?;
        } else {
            disp.draw_string(2, y, label, on, off, 1)?;
        }
    }
    if menu.scroll > 0 {
        disp.draw_char(120, 16, '^', on, off, 1)?;
    }
    if menu.scroll + ITEMS_PER_PAGE < entries.len() {
        disp.draw_char(120, 52, 'v', on, off, 1)?;
    }
    Ok(())
}

fn pressed<P: InputPin>(pin: &P) -> bool {
    pin.is_low().unwrap_or(false)
}

fn main() -> ! {
    let cp = cortex_m::Peripherals::take().unwrap();
    let dp = stm32f30x::Peripherals::take().unwrap();

    let mut flash = dp.FLASH.constrain();
    let mut rcc = dp.RCC.constrain();
    let clocks = rcc.cfgr.freeze(&mut flash.acr);
    let mut delay = hal::delay::Delay::new(cp.SYST, clocks);

    // I2C1 is Alternate Function 4 for GPIOs PB6,7.
    let mut gpiob = dp.GPIOB.split(&mut rcc.ahb);
    let scl = gpiob.pb6.into_af4(&mut gpiob.moder, &mut gpiob.afrl);
    let sda = gpiob.pb7.into_af4(&mut gpiob.moder, &mut gpiob.afrl);
    let i2c = I2c::i2c1(dp.I2C1, (scl, sda), 400.khz(), clocks, &mut rcc.apb1);

    let mut gpioc = dp.GPIOC.split(&mut rcc.ahb);
    let btn_up = gpioc
        .pc0
        .into_pull_up_input(&mut gpioc.moder, &mut gpioc.pupdr);
    let btn_down = gpioc
        .pc1
        .into_pull_up_input(&mut gpioc.moder, &mut gpioc.pupdr);
    let btn_select = gpioc
        .pc2
        .into_pull_up_input(&mut gpioc.moder, &mut gpioc.pupdr);

    let mut disp = Display::new(
        I2cInterface::new(i2c, DEFAULT_ADDRESS),
        Ssd1306::new(MonoConfig::new()),
        PixelCoord(128, 64),
    );
    disp.init(&mut NoResetPin, &mut delay).unwrap();

    let mut app = App {
        menu: Menu {
            screen: Screen::Main,
            selection: 0,
            scroll: 0,
        },
        contrast: 0xCF,
        inverted: false,
        bounce: None,
    };
    draw_menu(&mut disp, &app).unwrap();

    loop {
        if let Some(ref mut ball) = app.bounce {
            let r = Bounce::RADIUS;
            disp.fill_circle(ball.pos.0, ball.pos.1, r, BinaryColor::Off)
                .unwrap();
            ball.step(disp.size());
            disp.fill_circle(ball.pos.0, ball.pos.1, r, BinaryColor::On)
                .unwrap();
            if ball.frames_left == 0 {
                app.bounce = None;
                draw_menu(&mut disp, &app).unwrap();
            }
            delay.delay_ms(30u16);
            continue;
        }

        let mut redraw = true;
        if pressed(&btn_up) {
            app.menu.up();
        } else if pressed(&btn_down) {
            app.menu.down();
        } else if pressed(&btn_select) {
            match app.menu.selected() {
                MenuAction::Open(screen) => app.menu.open(screen),
                MenuAction::Back => app.menu.open(Screen::Main),
                MenuAction::BrightnessUp => {
                    app.contrast = app.contrast.saturating_add(0x20);
                    disp.set_contrast(app.contrast).unwrap();
                }
                MenuAction::BrightnessDown => {
                    app.contrast = app.contrast.saturating_sub(0x20);
                    disp.set_contrast(app.contrast).unwrap();
                }
                MenuAction::Invert => {
                    app.inverted = !app.inverted;
                    disp.invert(app.inverted).unwrap();
                }
                MenuAction::Animate => {
                    disp.clear().unwrap();
                    app.bounce = Some(Bounce {
                        pos: PixelCoord(20, 20),
                        vel: PixelCoord(2, 1),
                        frames_left: 300,
                    });
                    redraw = false;
                }
                MenuAction::Nothing => redraw = false,
            }
        } else {
            redraw = false;
        }
        if redraw {
            draw_menu(&mut disp, &app).unwrap();
        }
        delay.delay_ms(150u16);
    }
}

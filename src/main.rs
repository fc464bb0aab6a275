//! Temperature report firmware
//!
//! Samples an analog temperature sensor on PC0 with ADC1 in 8-bit mode, times the derivation
//! of every temperature with the SysTick and prints both on USART3 (PD8/PD9, 9600 8N1). LED PB0
//! is lit while a derivation is timed. Diagnostics are logged over RTT.
//!
//! The RTT logger setup and the panic and fault handlers are taken from the quartiq Stabilizer
//! firmware.
#![no_std]
#![no_main]

use core::sync::atomic::{AtomicBool, Ordering};

use stm32h7xx_hal::{self as hal, prelude::*};

use tempstamp::{
    design_parameters::UART_BAUD,
    hardware::{
        serial::{AdcSource, IndicatorPin, SerialSink},
        systick::SysTickPair,
    },
    report::{Peripherals, Reporter},
    settings::Settings,
};

/// The SysTick external reference runs at the core clock divided by 8.
const SYSTICK_DIVIDER: u32 = 8;

fn init_logging() {
    let channels = rtt_target::rtt_init_default!();
    // Note(unsafe): The closure does not establish a critical section but serializes access with
    // a lock. Contending messages are dropped.
    unsafe {
        rtt_target::set_print_channel_cs(
            channels.up.0,
            &((|arg, f| {
                static LOCKED: AtomicBool = AtomicBool::new(false);
                if LOCKED.compare_exchange_weak(
                    false,
                    true,
                    Ordering::Acquire,
                    Ordering::Relaxed,
                ) == Ok(false)
                {
                    f(arg);
                    LOCKED.store(false, Ordering::Release);
                }
            }) as rtt_target::CriticalSectionFunc),
        );
    }

    static LOGGER: rtt_logger::RTTLogger =
        rtt_logger::RTTLogger::new(log::LevelFilter::Info);
    log::set_logger(&LOGGER)
        .map(|()| log::set_max_level(log::LevelFilter::Trace))
        .unwrap();
}

#[cortex_m_rt::entry]
fn main() -> ! {
    init_logging();
    log::info!("Starting");

    let mut settings = Settings::from_json(include_bytes!("../settings.json"))
        .unwrap_or_else(|e| panic!("Embedded settings: {e}"));

    // Note(unwrap): The peripherals are only taken once.
    let core = cortex_m::Peripherals::take().unwrap();
    let device = hal::stm32::Peripherals::take().unwrap();

    let pwr = device.PWR.constrain();
    let vos = pwr.freeze();

    // The ADC kernel clock is taken from per_ck.
    device.RCC.d3ccipr.modify(|_, w| w.adcsel().per());

    let rcc = device.RCC.constrain();
    let ccdr = rcc
        .sysclk(48.MHz())
        .per_ck(64.MHz())
        .freeze(vos, &device.SYSCFG);

    let systick_hz = ccdr.clocks.c_ck().to_Hz() / SYSTICK_DIVIDER;
    settings.tick_ns = 1_000_000_000 / systick_hz;
    log::info!("Settings: {:?}", settings);

    let gpiob = device.GPIOB.split(ccdr.peripheral.GPIOB);
    let gpioc = device.GPIOC.split(ccdr.peripheral.GPIOC);
    let gpiod = device.GPIOD.split(ccdr.peripheral.GPIOD);

    let mut delay = core.SYST.delay(ccdr.clocks);
    let source = {
        let mut adc = hal::adc::Adc::adc1(
            device.ADC1,
            4.MHz(),
            &mut delay,
            ccdr.peripheral.ADC12,
            &ccdr.clocks,
        );
        adc.set_sample_time(hal::adc::AdcSampleTime::T_64);
        adc.set_resolution(hal::adc::Resolution::EightBit);
        adc.calibrate();

        AdcSource::new(adc.enable(), gpioc.pc0.into_analog())
    };
    let timer = SysTickPair::new(delay.free());

    let sink = {
        let tx = gpiod.pd8.into_alternate();
        let rx = gpiod.pd9.into_alternate();
        let serial = device
            .USART3
            .serial(
                (tx, rx),
                UART_BAUD.bps(),
                ccdr.peripheral.USART3,
                &ccdr.clocks,
            )
            .unwrap();
        SerialSink::new(serial)
    };

    let mut indicator = gpiob.pb0.into_push_pull_output();
    indicator.set_low();

    let mut reporter = Reporter::new(
        Peripherals {
            source,
            timer,
            sink,
            indicator: IndicatorPin::new(indicator),
        },
        settings.strategy,
        &settings,
    );

    match reporter.run() {
        Ok(never) => match never {},
        Err(e) => panic!("Report loop failed: {e}"),
    }
}

#[inline(never)]
#[panic_handler]
fn panic(info: &core::panic::PanicInfo) -> ! {
    use core::fmt::Write;
    use cortex_m::asm;
    use rtt_target::{ChannelMode, UpChannel};

    cortex_m::interrupt::disable();

    // Recursion protection
    static PANICKED: AtomicBool = AtomicBool::new(false);
    while PANICKED.load(Ordering::Relaxed) {
        asm::bkpt();
    }
    PANICKED.store(true, Ordering::Relaxed);

    // Analogous to panic-rtt-target
    if let Some(mut channel) = unsafe { UpChannel::conjure(0) } {
        channel.set_mode(ChannelMode::BlockIfFull);
        writeln!(channel, "{}", info).ok();
    }

    // Abort
    asm::udf();
}

#[cortex_m_rt::exception]
unsafe fn HardFault(ef: &cortex_m_rt::ExceptionFrame) -> ! {
    panic!("HardFault at {:#?}", ef);
}

#[cortex_m_rt::exception]
unsafe fn DefaultHandler(irqn: i16) {
    panic!("Unhandled exception (IRQn = {})", irqn);
}

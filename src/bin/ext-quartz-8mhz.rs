#![no_main]
#![no_std]

use panic_abort as _;
use rtic::app;

use stm32f1xx_hal::afio::AfioExt;
use stm32f1xx_hal::flash::FlashExt;
use stm32f1xx_hal::gpio::GpioExt;
use stm32f1xx_hal::pac::{GPIOA, USART1};
use stm32f1xx_hal::serial::Tx;

use log::LevelFilter;
use systick_monotonic::Systick;

use stm32f1_softpwm::support::{DwtStopwatch, GpioLine, Timer};
use stm32f1_softpwm::*;

//-----------------------------------------------------------------------------

type Console = SerialConsole<Tx<USART1>>;

type Engine = SoftPwm<
    'static,
    GpioLine,
    Timer,
    { config::PWM_CHANNELS },
    { config::BRIGHTNESS_LEVELS },
>;

static DUTIES: ChannelTable<{ config::PWM_CHANNELS }> = ChannelTable::new();
static LOGGER: ConsoleLogger<Console> = ConsoleLogger::new(LevelFilter::Info);

//-----------------------------------------------------------------------------

#[app(device = stm32f1xx_hal::pac, peripherals = true, dispatchers = [RTCALARM])]
mod app {
    use super::*;

    #[shared]
    struct Shared {
        pwm: Engine,
    }

    #[local]
    struct Local {
        profiler: LoadProfiler<DwtStopwatch>,
    }

    #[monotonic(binds = SysTick, default = true)]
    type MonoTimer = Systick<{ config::SYSTICK_RATE_HZ }>;

    #[init]
    fn init(ctx: init::Context) -> (Shared, Local, init::Monotonics) {
        use stm32f1xx_hal::prelude::_fugit_RateExtU32;
        use stm32f1xx_hal::prelude::_stm32_hal_rcc_RccExt;
        use stm32f1xx_hal::prelude::_stm32_hal_time_U32Ext;

        let mut dcb = ctx.core.DCB;
        let mut dwt = ctx.core.DWT;

        let mut flash = ctx.device.FLASH.constrain();

        let _gpioa = ctx.device.GPIOA.split();
        let mut gpiob = ctx.device.GPIOB.split();

        let mut afio = ctx.device.AFIO.constrain();

        let rcc = ctx.device.RCC.constrain();
        let clocks = rcc
            .cfgr
            .use_hse(config::MCU_XTAL_HZ.Hz())
            .sysclk(config::SYSCLK_HZ.Hz())
            .pclk1(36u32.MHz())
            .freeze(&mut flash.acr);

        let mono = Systick::new(ctx.core.SYST, clocks.sysclk().to_Hz());

        //---------------------------------------------------------------------

        let tx = gpiob.pb6.into_alternate_push_pull(&mut gpiob.crl);
        let rx = gpiob.pb7;

        let (tx, _rx) = stm32f1xx_hal::serial::Serial::usart1(
            ctx.device.USART1,
            (tx, rx),
            &mut afio.mapr,
            stm32f1xx_hal::serial::Config::default().baudrate(config::CONSOLE_BAUD_RATE.bps()),
            clocks,
        )
        .split();

        LOGGER.attach(SerialConsole::new(tx));
        let _ = log::set_logger(&LOGGER).map(|()| log::set_max_level(LOGGER.level()));

        //---------------------------------------------------------------------

        // hold the tick timer while the core is halted by the debugger
        ctx.device
            .DBGMCU
            .cr
            .modify(|_, w| w.dbg_tim2_stop().set_bit());

        let outputs: [GpioLine; config::PWM_CHANNELS] =
            core::array::from_fn(|pin| GpioLine::new(GPIOA::ptr(), pin as u8));

        let mut pwm = Engine::new(
            &DUTIES,
            outputs,
            Timer::new(ctx.device.TIM2, clocks.pclk1_tim()),
            Alignment::Staggered,
        );
        pwm.begin(config::PWM_FREQ_HZ.Hz());

        let profiler = LoadProfiler::new(
            DwtStopwatch::new(&mut dcb, &mut dwt, clocks.sysclk()),
            config::LOAD_SAMPLE_US,
        );

        //---------------------------------------------------------------------

        (Shared { pwm }, Local { profiler }, init::Monotonics(mono))
    }

    //-------------------------------------------------------------------------

    #[idle(shared = [pwm], local = [profiler])]
    fn idle(mut ctx: idle::Context) -> ! {
        // idle is the lowest priority, so the tick keeps preempting the busy-wait
        let sample = ctx
            .local
            .profiler
            .sample(|enable| ctx.shared.pwm.lock(|pwm| pwm.set_listening(enable)));

        if let Some(report) = ctx.shared.pwm.lock(|pwm| pwm.load_report(sample)) {
            let _ = LOGGER.print(format_args!("{}", report));
        }

        fade::spawn().unwrap();

        loop {
            cortex_m::asm::wfi();
        }
    }

    //-------------------------------------------------------------------------

    // Every tick must finish before the next one. Interrupts that cannot wait
    // a whole tick go above this priority.
    #[task(binds = TIM2, shared = [pwm], priority = 2)]
    fn tim2(mut ctx: tim2::Context) {
        ctx.shared.pwm.lock(|pwm| pwm.update());
    }

    #[task(shared = [pwm], local = [step: u16 = 0], priority = 1)]
    fn fade(mut ctx: fade::Context) {
        use systick_monotonic::*;

        let levels = Engine::BRIGHTNESS_LEVELS;
        let step = *ctx.local.step;

        if step == levels {
            let overruns = ctx.shared.pwm.lock(|pwm| {
                pwm.all_off();
                pwm.overruns()
            });
            log::info!("sweep done, {} tick overruns", overruns);
            *ctx.local.step = 0;
        } else {
            let spacing = usize::from(levels) / config::PWM_CHANNELS;
            for channel in 0..config::PWM_CHANNELS {
                let duty = (usize::from(step) + channel * spacing) % usize::from(levels);
                DUTIES.set(channel, duty as u8);
            }
            *ctx.local.step = step + 1;
        }

        fade::spawn_after(config::FADE_STEP_MS.millis()).unwrap();
    }
}

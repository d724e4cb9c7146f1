// crates/kf_runtime/src/routine.rs

//! 外层例程
//!
//! 初始化场与分布（初始总体取初始 (ρ, u) 的平衡态），以
//! 全归约求初始质量；循环 `start_iteration+1 ..= end_iteration`
//! 逐步调用步进核，步前把写出 / 分析 / 备份三谓词之析取设为
//! 本步的存储开关；循环结束后复核质量并汇总：总耗时、分相
//! 耗时、MLUPS、初始 / 最终质量与相对质量差。
//!
//! 质量直接从总体归约（Σ_cells Σ_i f_i），初始时与密度场一致，
//! 之后恒为当前值，不依赖场的写出节奏。

use glam::IVec3;
use kf_comm::{Communicator, Transport};
use kf_config::{OutputFormat, SimulationConfig};
use kf_io::{CheckpointWriter, DatWriter, FieldWriter, SeriesWriter, WriteSchedule};
use kf_lattice::{GlobalSpace, HaloSpace, LocalSpace, MemoryLayout, Stencil};
use kf_physics::{equilibrium, init, Collision, CollisionParams};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use crate::algorithm::StepKernel;
use crate::builder::DynSimulation;
use crate::distribution::{interior_mass, pack_local, unpack_local, Distribution};
use crate::error::{RuntimeError, RuntimeResult};
use crate::fields::LocalFields;
use crate::metrics::RunMetrics;

/// 一次运行的汇总结果
#[derive(Debug, Clone, Copy, Default)]
pub struct RunSummary {
    /// 初始总质量（全域）
    pub initial_mass: f64,
    /// 最终总质量（全域）
    pub final_mass: f64,
    /// 相对质量差 |Σ_final − Σ_initial| / Σ_initial
    pub difference_mass: f64,
    /// 整步累计秒数
    pub total_time: f64,
    /// 计算相累计秒数
    pub computation_time: f64,
    /// 通信相累计秒数
    pub communication_time: f64,
    /// 每秒百万格子更新数
    pub mlups: f64,
    /// 执行的迭代数
    pub iterations: u64,
    /// 熵求解回退到 BGK 的单元次数（本 rank）
    pub bgk_fallbacks: u64,
}

/// 外层例程（按模板 / 布局 / 碰撞变体单态化）
pub struct Routine<L: Stencil, ML: MemoryLayout, C: Collision<L, ML>> {
    config: SimulationConfig,
    global: GlobalSpace,
    local: LocalSpace,
    hs: HaloSpace<L, ML>,
    global_offset: IVec3,
    dist: Distribution,
    fields: LocalFields,
    kernel: StepKernel<L, ML, C>,
    comm: Communicator,
    field_writer: Option<DatWriter>,
    checkpoint: CheckpointWriter,
    series: SeriesWriter,
    schedule: WriteSchedule,
    restore_path: Option<PathBuf>,
    pool: Arc<rayon::ThreadPool>,
    metrics: RunMetrics,
}

impl<L: Stencil, ML: MemoryLayout, C: Collision<L, ML>> Routine<L, ML, C> {
    /// 组装例程
    pub fn new(
        config: SimulationConfig,
        transport: Box<dyn Transport>,
        restore_path: Option<PathBuf>,
    ) -> RuntimeResult<Self> {
        let global = GlobalSpace::new(IVec3::from_array(config.extent));
        let local = LocalSpace::new(&global, config.processes);
        let hs: HaloSpace<L, ML> = HaloSpace::new(&local);

        let comm = Communicator::new(&hs, transport);
        let topology = comm.topology();
        let global_offset = global.offset(&local, topology.rank_vector());

        let schedule = WriteSchedule {
            write_step: config.output.write_step,
            backup_step: config.output.backup_step,
            analysis_step: config.output.analysis_step,
        };

        let field_writer = match config.output.format {
            OutputFormat::Dat => Some(DatWriter::new(
                &config.output.directory,
                &config.output.prefix,
                topology.rank,
                local.length,
                global_offset,
                schedule,
            )),
            OutputFormat::None => None,
        };
        let checkpoint = CheckpointWriter::new(
            &config.output.directory,
            &config.output.prefix,
            topology.rank,
            schedule,
        );
        let series = SeriesWriter::new(
            &config.output.directory,
            &config.output.prefix,
            &["total_energy", "total_density"],
            schedule,
        );

        let params = CollisionParams {
            relaxation_time: config.relaxation_time,
            forcing_scheme: config.forcing_scheme,
            force: config.force.clone(),
        };
        let kernel = StepKernel::new(
            local,
            hs,
            global_offset,
            C::new(&params),
            config.threads,
        );

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.threads)
            .build()
            .map_err(|e| RuntimeError::internal(format!("线程池创建失败: {e}")))?;

        Ok(Self {
            global,
            local,
            hs,
            global_offset,
            dist: Distribution::new(hs.buffer_len()),
            fields: LocalFields::new(local.volume),
            kernel,
            comm,
            field_writer,
            checkpoint,
            series,
            schedule,
            restore_path,
            pool: Arc::new(pool),
            metrics: RunMetrics::default(),
            config,
        })
    }

    /// 初始化分布与逐单元场
    ///
    /// 初始总体写入 next 缓冲区：第一次迭代开头的交换把它变成
    /// previous。断点续算时从备份恢复并核对迭代号。
    fn initialize(&mut self) -> RuntimeResult<()> {
        if let Some(path) = self.restore_path.clone() {
            let (iteration, packed) =
                CheckpointWriter::read_distribution(&path, L::Q, self.local.volume)?;
            if iteration != self.config.start_iteration {
                warn!(
                    "备份迭代号 {} 与配置起始迭代号 {} 不一致，以配置为准",
                    iteration, self.config.start_iteration
                );
            }
            unpack_local(&packed, self.dist.next_mut(), &self.hs, &self.local);
            return Ok(());
        }

        let f_next = self.dist.next_mut();
        for x in 0..self.local.length.x {
            for y in 0..self.local.length.y {
                for z in 0..self.local.length.z {
                    let p_local = IVec3::new(x, y, z);
                    let p_global = p_local + self.global_offset;
                    let density =
                        init::density_at(&self.config.initial_density, &self.global, p_global);
                    let velocity =
                        init::velocity_at(&self.config.initial_velocity, &self.global, p_global);
                    let velocity2 = velocity.length_squared();

                    let p_halo = p_local + L::HALO;
                    for i in 0..L::Q {
                        f_next[self.hs.index_pop(p_halo, i)] =
                            equilibrium::compute::<L>(density, velocity, velocity2, i);
                    }

                    let cell = self.local.index(p_local);
                    self.fields.density[cell] = density;
                    self.fields.alpha[cell] = 2.0;
                    for d in 0..3 {
                        self.fields.velocity[d][cell] = velocity[d];
                        self.fields.force[d][cell] = 0.0;
                    }
                }
            }
        }
        Ok(())
    }

    fn write_fields(&mut self, iteration: u64) -> RuntimeResult<()> {
        if let Some(writer) = &mut self.field_writer {
            if writer.is_written(iteration) {
                writer.open(iteration)?;
                if self.config.output.write_density {
                    writer.write_scalar_field("density", &self.fields.density)?;
                }
                if self.config.output.write_velocity {
                    let components: Vec<&[f64]> = self.fields.velocity[..L::D]
                        .iter()
                        .map(|c| c.as_slice())
                        .collect();
                    writer.write_vector_field("velocity", &components)?;
                }
                if self.config.output.write_force {
                    let components: Vec<&[f64]> = self.fields.force[..L::D]
                        .iter()
                        .map(|c| c.as_slice())
                        .collect();
                    writer.write_vector_field("force", &components)?;
                }
                if self.config.output.write_alpha {
                    writer.write_scalar_field("alpha", &self.fields.alpha)?;
                }
                writer.close()?;
            }
        }

        if self.checkpoint.is_backed_up(iteration) {
            let packed = pack_local(self.dist.next(), &self.hs, &self.local);
            self.checkpoint
                .write_distribution(iteration, L::Q, self.local.volume, &packed)?;
        }
        Ok(())
    }

    fn write_analyses(&mut self, iteration: u64) -> RuntimeResult<()> {
        if self.series.is_analyzed(iteration) {
            // 归约是集合操作，所有 rank 都要参与
            let energy = self.comm.reduce_sum(self.fields.total_kinetic_energy())?;
            let density = self.comm.reduce_sum(self.fields.total_density())?;
            if self.comm.topology().rank == 0 {
                self.series.append(iteration, &[energy, density])?;
            }
        }
        Ok(())
    }

    fn total_mass(&self) -> RuntimeResult<f64> {
        let local_mass = interior_mass(self.dist.next(), &self.hs, &self.local);
        Ok(self.comm.reduce_sum(local_mass)?)
    }

    fn log_inputs(&self) {
        if self.comm.topology().rank != 0 {
            return;
        }
        info!("================= 参数 =================");
        info!("格子            : {}", L::NAME);
        info!("内存布局        : {}", ML::NAME);
        info!("碰撞算子        : {}", C::NAME);
        info!(
            "全局边长        : {} x {} x {}",
            self.global.length.x, self.global.length.y, self.global.length.z
        );
        info!("进程数          : {}", self.comm.topology().size);
        info!("传输后端        : {}", self.comm.transport_name());
        info!("线程数          : {}", self.config.threads);
        info!("松弛时间        : {}", self.config.relaxation_time);
        info!("黏度            : {}", self.config.viscosity());
        info!("起始迭代        : {}", self.config.start_iteration);
        info!("结束迭代        : {}", self.config.end_iteration);
    }

    fn log_outputs(&self, summary: &RunSummary) {
        if self.comm.topology().rank != 0 {
            return;
        }
        info!("================= 结果 =================");
        info!("总耗时          : {:.6} s", summary.total_time);
        info!("计算耗时        : {:.6} s", summary.computation_time);
        info!("通信耗时        : {:.6} s", summary.communication_time);
        info!("MLUPS           : {:.3}", summary.mlups);
        info!("初始质量        : {:.15}", summary.initial_mass);
        info!("最终质量        : {:.15}", summary.final_mass);
        info!("相对质量差      : {:.3e}", summary.difference_mass);
        if summary.bgk_fallbacks > 0 {
            info!("熵回退单元次数  : {}", summary.bgk_fallbacks);
        }
    }
}

impl<L: Stencil, ML: MemoryLayout, C: Collision<L, ML>> DynSimulation for Routine<L, ML, C> {
    fn name(&self) -> String {
        format!(
            "{} / {} / {} @ {}x{}x{}",
            L::NAME,
            ML::NAME,
            C::NAME,
            self.global.length.x,
            self.global.length.y,
            self.global.length.z
        )
    }

    fn run(&mut self) -> RuntimeResult<RunSummary> {
        self.initialize()?;
        self.log_inputs();

        let initial_mass = self.total_mass()?;

        self.write_fields(self.config.start_iteration)?;
        self.write_analyses(self.config.start_iteration)?;

        let start = self.config.start_iteration;
        let end = self.config.end_iteration;
        let pool = Arc::clone(&self.pool);
        pool.install(|| -> RuntimeResult<()> {
            for iteration in start + 1..=end {
                self.kernel.set_is_stored(self.schedule.is_stored(iteration));
                self.kernel
                    .iterate(iteration, &mut self.dist, &mut self.fields, &mut self.comm)?;
                self.metrics.accumulate(self.kernel.timings());

                self.write_fields(iteration)?;
                self.write_analyses(iteration)?;
            }
            Ok(())
        })?;

        let final_mass = self.total_mass()?;
        self.metrics.bgk_fallbacks = self.kernel.fallbacks();

        let summary = RunSummary {
            initial_mass,
            final_mass,
            difference_mass: (initial_mass - final_mass).abs() / initial_mass,
            total_time: self.metrics.total_time,
            computation_time: self.metrics.computation_time,
            communication_time: self.metrics.communication_time,
            mlups: self.metrics.mlups(self.global.volume),
            iterations: self.metrics.iterations,
            bgk_fallbacks: self.metrics.bgk_fallbacks,
        };
        self.log_outputs(&summary);
        Ok(summary)
    }

    fn fields(&self) -> &LocalFields {
        &self.fields
    }
}

use std::time::{Duration, Instant};

use log::{debug, error, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use wgpu::util::DeviceExt;
use winit::{
    dpi::PhysicalSize,
    event::{ElementState, Event, KeyEvent, WindowEvent},
    event_loop::EventLoopBuilder,
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowBuilder},
};

use super::{Canvas, CosmosError, Scene, SceneConfig};

pub struct State<'a> {
    // Device/Context objects
    surface: wgpu::Surface<'a>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    pub size: PhysicalSize<u32>,
    pub window: &'a Window,

    // Assets
    color_buffer: wgpu::Texture,
    screen_parameters: wgpu::Buffer,

    // Pipeline Objects
    screen_pipeline: wgpu::RenderPipeline,
    screen_bind_group: wgpu::BindGroup,

    // Frame source
    scene: Scene,
    canvas: Canvas,
    rng: StdRng,
    clear_color: wgpu::Color,
}

/// Scale for the fullscreen quad so the canvas keeps its aspect ratio inside
/// a window of any shape. Only the first two lanes are used by the shader.
pub fn letterbox_scale(canvas: (u32, u32), window: PhysicalSize<u32>) -> [f32; 4] {
    if window.width == 0 || window.height == 0 || canvas.0 == 0 || canvas.1 == 0 {
        return [1.0, 1.0, 0.0, 0.0];
    }
    let canvas_aspect = canvas.0 as f32 / canvas.1 as f32;
    let window_aspect = window.width as f32 / window.height as f32;
    if window_aspect > canvas_aspect {
        [canvas_aspect / window_aspect, 1.0, 0.0, 0.0]
    } else {
        [1.0, window_aspect / canvas_aspect, 0.0, 0.0]
    }
}

impl<'a> State<'a> {
    pub async fn new(window: &'a Window, scene: Scene, canvas: Canvas, rng: StdRng) -> Result<State<'a>, CosmosError> {
        let size = window.inner_size();

        let instance_descriptor = wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(), ..Default::default()
        };
        let instance = wgpu::Instance::new(instance_descriptor);
        let surface = instance.create_surface(window)
            .map_err(|e| CosmosError::Gpu(e.to_string()))?;

        let adapter_descriptor = wgpu::RequestAdapterOptionsBase {
            power_preference: wgpu::PowerPreference::default(),
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        };
        let adapter = instance.request_adapter(&adapter_descriptor)
            .await
            .ok_or_else(|| CosmosError::Gpu("no compatible adapter".into()))?;

        let device_descriptor = wgpu::DeviceDescriptor {
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            label: Some("Device"),
        };
        let (device, queue) = adapter
            .request_device(&device_descriptor, None)
            .await
            .map_err(|e| CosmosError::Gpu(e.to_string()))?;

        let surface_capabilities = surface.get_capabilities(&adapter);
        let surface_format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_capabilities.formats.first().copied())
            .ok_or_else(|| CosmosError::Gpu("surface reports no formats".into()))?;
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: surface_capabilities.present_modes[0],
            alpha_mode: surface_capabilities.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2
        };
        surface.configure(&device, &config);

        let (color_buffer, color_buffer_view, sampler, screen_parameters) =
            Self::create_assets(&device, &canvas, size);

        let (screen_pipeline, screen_bind_group) = Self::make_pipeline(
            &device,
            surface_format,
            &color_buffer_view,
            &sampler,
            &screen_parameters,
        );

        let [r, g, b, a] = scene.background.channels().map(|c| c as f64 / 255.0);

        Ok(Self {
            // Device/Context objects
            surface,
            device,
            queue,
            config,
            size,
            window,
            // Assets
            color_buffer,
            screen_parameters,
            // Pipeline Objects
            screen_pipeline,
            screen_bind_group,
            // Frame source
            scene,
            canvas,
            rng,
            clear_color: wgpu::Color { r, g, b, a },
        })
    }

    fn create_assets(
        device: &wgpu::Device,
        canvas: &Canvas,
        size: PhysicalSize<u32>,
    ) -> (wgpu::Texture, wgpu::TextureView, wgpu::Sampler, wgpu::Buffer) {
        // The canvas holds sRGB-encoded bytes, so sample it through an sRGB view
        let color_buffer_description = wgpu::TextureDescriptor {
            label: Some("Canvas Texture"),
            size: wgpu::Extent3d {
                width: canvas.width(),
                height: canvas.height(),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::COPY_DST | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        };
        let color_buffer = device.create_texture(&color_buffer_description);
        let color_buffer_view = color_buffer.create_view(&wgpu::TextureViewDescriptor::default());

        let sampler_descriptor = wgpu::SamplerDescriptor {
            label: Some("Canvas Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        };
        let sampler = device.create_sampler(&sampler_descriptor);

        let scale = letterbox_scale((canvas.width(), canvas.height()), size);
        let screen_parameters = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Screen Parameters"),
            contents: bytemuck::cast_slice(&scale),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        (color_buffer, color_buffer_view, sampler, screen_parameters)
    }

    fn make_pipeline(
        device: &wgpu::Device,
        target_format: wgpu::TextureFormat,
        color_buffer_view: &wgpu::TextureView,
        sampler: &wgpu::Sampler,
        screen_parameters: &wgpu::Buffer,
    ) -> (wgpu::RenderPipeline, wgpu::BindGroup) {
        let screen_bind_group_layout_descriptor = wgpu::BindGroupLayoutDescriptor {
            label: Some("Screen Bind Group Layout Descriptor"),
            entries: &[
                // Sampler entry
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
                // Texture entry
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                // Letterbox scale
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        };
        let screen_bind_group_layout = device.create_bind_group_layout(&screen_bind_group_layout_descriptor);

        let screen_bind_group_descriptor = wgpu::BindGroupDescriptor {
            label: Some("Screen bind Group Descriptor"),
            layout: &screen_bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(color_buffer_view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: screen_parameters.as_entire_binding(),
                },
            ],
        };
        let screen_bind_group = device.create_bind_group(&screen_bind_group_descriptor);

        let screen_pipeline_layout_descriptor = wgpu::PipelineLayoutDescriptor {
            label: Some("Screen Pipeline Layout"),
            bind_group_layouts: &[&screen_bind_group_layout],
            push_constant_ranges: &[],
        };
        let screen_pipeline_layout = device.create_pipeline_layout(&screen_pipeline_layout_descriptor);

        let shader_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Screen Shader Module"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../../shaders/screen_shader.wgsl").into()),
        });

        let screen_pipeline_descriptor = wgpu::RenderPipelineDescriptor {
            label: Some("Screen Pipeline Descriptor"),
            layout: Some(&screen_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader_module,
                entry_point: "vert_main",
                buffers: &[],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader_module,
                entry_point: "frag_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format: target_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
        };
        let screen_pipeline = device.create_render_pipeline(&screen_pipeline_descriptor);

        (screen_pipeline, screen_bind_group)
    }

    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);

            let scale = letterbox_scale((self.canvas.width(), self.canvas.height()), new_size);
            self.queue.write_buffer(&self.screen_parameters, 0, bytemuck::cast_slice(&scale));
        }
    }

    pub fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let start_time = Instant::now();
        self.prepare_frame();

        let drawable = self.surface.get_current_texture()?;
        let image_view = drawable.texture.create_view(&wgpu::TextureViewDescriptor::default());

        let command_encoder_descriptor = wgpu::CommandEncoderDescriptor {
            label: Some("Render Encoder")
        };
        let mut command_encoder = self.device.create_command_encoder(&command_encoder_descriptor);

        let color_attachment = wgpu::RenderPassColorAttachment {
            view: &image_view,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(self.clear_color),
                store: wgpu::StoreOp::Store,
            },
        };

        let render_pass_descriptor = wgpu::RenderPassDescriptor {
            label: Some("Render Pass"),
            color_attachments: &[Some(color_attachment)],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        };

        {
            let mut render_pass = command_encoder.begin_render_pass(&render_pass_descriptor);
            render_pass.set_pipeline(&self.screen_pipeline);
            render_pass.set_bind_group(0, &self.screen_bind_group, &[]);
            render_pass.draw(0..6, 0..1);
        }

        self.queue.submit(std::iter::once(command_encoder.finish()));

        drawable.present();

        debug!(
            "Rendered in {:?}, sphere count: {}, chord count: {}",
            start_time.elapsed(),
            self.scene.spheres.len(),
            self.scene.chord_total()
        );
        Ok(())
    }

    // Draw a fresh frame on the CPU and copy it into the canvas texture
    fn prepare_frame(&mut self) {
        self.scene.paint(&mut self.canvas, &mut self.rng);

        self.queue.write_texture(
            wgpu::ImageCopyTexture {
                texture: &self.color_buffer,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            self.canvas.as_raw(),
            wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(4 * self.canvas.width()),
                rows_per_image: Some(self.canvas.height()),
            },
            self.color_buffer.size(),
        );
    }
}

#[derive(Debug, Clone, Copy)]
enum CustomEvent {
    Timer,
}

pub fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

pub async fn run(scene_config: SceneConfig) -> Result<(), CosmosError> {
    let scene = scene_config.build_scene()?;
    let canvas = Canvas::new(scene_config.width, scene_config.height);
    let rng = seeded_rng(scene_config.seed);

    let event_loop = EventLoopBuilder::<CustomEvent>::with_user_event()
        .build()
        .map_err(|e| CosmosError::Window(e.to_string()))?;
    let window = WindowBuilder::new()
        .with_title("Cosmic Sphere")
        .with_inner_size(PhysicalSize::new(scene_config.width, scene_config.height))
        .build(&event_loop)
        .map_err(|e| CosmosError::Window(e.to_string()))?;
    let event_loop_proxy = event_loop.create_proxy();

    let frame_interval = Duration::from_millis(scene_config.frame_interval_ms.max(1));
    std::thread::spawn(move || loop {
        std::thread::sleep(frame_interval);
        if event_loop_proxy.send_event(CustomEvent::Timer).is_err() {
            break;
        }
    });

    let mut program_state = State::new(&window, scene, canvas, rng).await?;
    info!(
        "window open at {}x{}, drawing {} chords per frame",
        program_state.size.width,
        program_state.size.height,
        program_state.scene.chord_total()
    );

    event_loop.run(move |event, elwt| match event {
        Event::UserEvent(CustomEvent::Timer) => {
            program_state.window.request_redraw();
        },

        Event::WindowEvent { window_id, ref event } if window_id == program_state.window.id() => match event {
            WindowEvent::Resized(physical_size) => program_state.resize(*physical_size),

            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        state: ElementState::Pressed, repeat: false, .. }, .. } => {
                info!("Goodbye see you!");
                elwt.exit();
            }

            WindowEvent::RedrawRequested => match program_state.render() {
                Ok(_) => {},
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    warn!("surface lost, reconfiguring");
                    program_state.resize(program_state.size)
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    error!("gpu out of memory");
                    elwt.exit()
                }
                Err(e) => warn!("{:?}", e),
            }

            _ => (),
        },

        _ => {},
    }).map_err(|e| CosmosError::Window(e.to_string()))
}

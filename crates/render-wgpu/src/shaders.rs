/// WGSL shader for lit instanced meshes: the blob iso-surface, collision
/// solids, and image planes all go through it. Lighting follows the scene's
/// rig: hemisphere + directional + ambient.
pub const MESH_SHADER: &str = r#"
struct Uniforms {
    view_proj: mat4x4<f32>,
    hemisphere_sky: vec4<f32>,     // rgb + intensity
    hemisphere_ground: vec4<f32>,  // rgb + unused
    hemisphere_dir: vec4<f32>,     // xyz + unused
    directional: vec4<f32>,        // rgb + intensity
    ambient: vec4<f32>,            // rgb + intensity
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) color: vec3<f32>,
};

struct InstanceInput {
    @location(3) model_0: vec4<f32>,
    @location(4) model_1: vec4<f32>,
    @location(5) model_2: vec4<f32>,
    @location(6) model_3: vec4<f32>,
    @location(7) color: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_normal: vec3<f32>,
    @location(1) color: vec4<f32>,
};

@vertex
fn vs_main(vertex: VertexInput, instance: InstanceInput) -> VertexOutput {
    let model = mat4x4<f32>(
        instance.model_0,
        instance.model_1,
        instance.model_2,
        instance.model_3,
    );
    let world_pos = model * vec4<f32>(vertex.position, 1.0);
    let world_normal = (model * vec4<f32>(vertex.normal, 0.0)).xyz;

    var out: VertexOutput;
    out.clip_position = uniforms.view_proj * world_pos;
    out.world_normal = normalize(world_normal);
    out.color = vec4<f32>(vertex.color, 1.0) * instance.color;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let n = normalize(in.world_normal);

    // Hemisphere: blend ground to sky over the normal's elevation.
    let hemi_mix = n.y * 0.5 + 0.5;
    let hemi = mix(uniforms.hemisphere_ground.rgb, uniforms.hemisphere_sky.rgb, hemi_mix)
        * uniforms.hemisphere_sky.a;

    let light_dir = normalize(uniforms.hemisphere_dir.xyz);
    let diffuse = uniforms.directional.rgb * uniforms.directional.a * max(dot(n, light_dir), 0.0);

    let ambient = uniforms.ambient.rgb * uniforms.ambient.a;

    let lighting = hemi + diffuse + ambient;
    return vec4<f32>(in.color.rgb * lighting, in.color.a);
}
"#;

/// WGSL shader for the grid floor lines.
pub const GRID_SHADER: &str = r#"
struct Uniforms {
    view_proj: mat4x4<f32>,
    hemisphere_sky: vec4<f32>,
    hemisphere_ground: vec4<f32>,
    hemisphere_dir: vec4<f32>,
    directional: vec4<f32>,
    ambient: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

struct GridVertex {
    @location(0) position: vec3<f32>,
    @location(1) color: vec4<f32>,
};

struct GridOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec4<f32>,
};

@vertex
fn vs_grid(vertex: GridVertex) -> GridOutput {
    var out: GridOutput;
    out.clip_position = uniforms.view_proj * vec4<f32>(vertex.position, 1.0);
    out.color = vertex.color;
    return out;
}

@fragment
fn fs_grid(in: GridOutput) -> @location(0) vec4<f32> {
    return in.color;
}
"#;

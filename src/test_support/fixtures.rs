//! Template texts and manifests shared by generator tests.
//!
//! Templates are trimmed versions of what the IDEs write for an empty
//! project, plus a few stale entries a previous generation would have left
//! behind so tests can check they are replaced.

/// A static-library Xcode project with one target and a stale source file.
pub mod pbxproj {
    pub const ROOT: &str = "1A0000000000000000000001";
    pub const MAIN_GROUP: &str = "1A0000000000000000000002";
    pub const PRODUCTS_GROUP: &str = "1A0000000000000000000003";
    pub const PRODUCT: &str = "1A0000000000000000000004";
    pub const STALE_GROUP: &str = "1A0000000000000000000005";
    pub const STALE_FILE: &str = "1A0000000000000000000006";
    pub const STALE_BUILD_FILE: &str = "1A0000000000000000000007";
    pub const TARGET: &str = "1A0000000000000000000008";
    pub const SOURCES_PHASE: &str = "1A0000000000000000000009";
    pub const FRAMEWORKS_PHASE: &str = "1A000000000000000000000A";
    pub const PROJECT_DEBUG: &str = "1A000000000000000000000C";
    pub const PROJECT_RELEASE: &str = "1A000000000000000000000D";
    pub const TARGET_DEBUG: &str = "1A000000000000000000000F";
    pub const TARGET_RELEASE: &str = "1A0000000000000000000010";

    pub const TEMPLATE: &str = r#"// !$*UTF8*$!
{
	archiveVersion = 1;
	classes = {
	};
	objectVersion = 50;
	objects = {

/* Begin PBXBuildFile section */
		1A0000000000000000000007 /* stale.c in Sources */ = {isa = PBXBuildFile; fileRef = 1A0000000000000000000006 /* stale.c */; };
/* End PBXBuildFile section */

/* Begin PBXFileReference section */
		1A0000000000000000000004 /* libTemplate.a */ = {isa = PBXFileReference; explicitFileType = archive.ar; includeInIndex = 0; path = libTemplate.a; sourceTree = BUILT_PRODUCTS_DIR; };
		1A0000000000000000000006 /* stale.c */ = {isa = PBXFileReference; lastKnownFileType = sourcecode.c.c; path = stale.c; sourceTree = "<group>"; };
/* End PBXFileReference section */

/* Begin PBXFrameworksBuildPhase section */
		1A000000000000000000000A /* Frameworks */ = {
			isa = PBXFrameworksBuildPhase;
			buildActionMask = 2147483647;
			files = (
			);
			runOnlyForDeploymentPostprocessing = 0;
		};
/* End PBXFrameworksBuildPhase section */

/* Begin PBXGroup section */
		1A0000000000000000000002 = {
			isa = PBXGroup;
			children = (
				1A0000000000000000000003 /* Products */,
				1A0000000000000000000005 /* src */,
			);
			sourceTree = "<group>";
		};
		1A0000000000000000000003 /* Products */ = {
			isa = PBXGroup;
			children = (
				1A0000000000000000000004 /* libTemplate.a */,
			);
			name = Products;
			sourceTree = "<group>";
		};
		1A0000000000000000000005 /* src */ = {
			isa = PBXGroup;
			children = (
				1A0000000000000000000006 /* stale.c */,
			);
			path = src;
			sourceTree = "<group>";
		};
/* End PBXGroup section */

/* Begin PBXNativeTarget section */
		1A0000000000000000000008 /* Template */ = {
			isa = PBXNativeTarget;
			buildConfigurationList = 1A000000000000000000000E /* Build configuration list for PBXNativeTarget "Template" */;
			buildPhases = (
				1A0000000000000000000009 /* Sources */,
				1A000000000000000000000A /* Frameworks */,
			);
			buildRules = (
			);
			dependencies = (
			);
			name = Template;
			productName = Template;
			productReference = 1A0000000000000000000004 /* libTemplate.a */;
			productType = "com.apple.product-type.library.static";
		};
/* End PBXNativeTarget section */

/* Begin PBXProject section */
		1A0000000000000000000001 /* Project object */ = {
			isa = PBXProject;
			attributes = {
				LastUpgradeCheck = 1000;
			};
			buildConfigurationList = 1A000000000000000000000B /* Build configuration list for PBXProject "Template" */;
			compatibilityVersion = "Xcode 9.3";
			mainGroup = 1A0000000000000000000002;
			productRefGroup = 1A0000000000000000000003;
			projectDirPath = "";
			projectRoot = "";
			targets = (
				1A0000000000000000000008 /* Template */,
			);
		};
/* End PBXProject section */

/* Begin PBXSourcesBuildPhase section */
		1A0000000000000000000009 /* Sources */ = {
			isa = PBXSourcesBuildPhase;
			buildActionMask = 2147483647;
			files = (
				1A0000000000000000000007 /* stale.c in Sources */,
			);
			runOnlyForDeploymentPostprocessing = 0;
		};
/* End PBXSourcesBuildPhase section */

/* Begin XCBuildConfiguration section */
		1A000000000000000000000C /* Debug */ = {
			isa = XCBuildConfiguration;
			buildSettings = {
				ALWAYS_SEARCH_USER_PATHS = NO;
				GCC_OPTIMIZATION_LEVEL = 0;
			};
			name = Debug;
		};
		1A000000000000000000000D /* Release */ = {
			isa = XCBuildConfiguration;
			buildSettings = {
				ALWAYS_SEARCH_USER_PATHS = NO;
			};
			name = Release;
		};
		1A000000000000000000000F /* Debug */ = {
			isa = XCBuildConfiguration;
			buildSettings = {
				CODE_SIGN_STYLE = Automatic;
			};
			name = Debug;
		};
		1A0000000000000000000010 /* Release */ = {
			isa = XCBuildConfiguration;
			buildSettings = {
				CODE_SIGN_STYLE = Automatic;
			};
			name = Release;
		};
/* End XCBuildConfiguration section */

/* Begin XCConfigurationList section */
		1A000000000000000000000B /* Build configuration list for PBXProject "Template" */ = {
			isa = XCConfigurationList;
			buildConfigurations = (
				1A000000000000000000000C /* Debug */,
				1A000000000000000000000D /* Release */,
			);
			defaultConfigurationIsVisible = 0;
			defaultConfigurationName = Release;
		};
		1A000000000000000000000E /* Build configuration list for PBXNativeTarget "Template" */ = {
			isa = XCConfigurationList;
			buildConfigurations = (
				1A000000000000000000000F /* Debug */,
				1A0000000000000000000010 /* Release */,
			);
			defaultConfigurationIsVisible = 0;
			defaultConfigurationName = Release;
		};
/* End XCConfigurationList section */
	};
	rootObject = 1A0000000000000000000001 /* Project object */;
}
"#;
}

/// A Visual Studio C++ project declaring Win32 and x64 configurations.
///
/// Only the Win32 configurations have a `Configuration` property group and
/// only `Debug|Win32` has item definitions, so x64 exercises creation.
pub mod vcxproj {
    pub const TEMPLATE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<Project DefaultTargets="Build" ToolsVersion="15.0" xmlns="http://schemas.microsoft.com/developer/msbuild/2003">
  <ItemGroup Label="ProjectConfigurations">
    <ProjectConfiguration Include="Debug|Win32">
      <Configuration>Debug</Configuration>
      <Platform>Win32</Platform>
    </ProjectConfiguration>
    <ProjectConfiguration Include="Release|Win32">
      <Configuration>Release</Configuration>
      <Platform>Win32</Platform>
    </ProjectConfiguration>
    <ProjectConfiguration Include="Debug|x64">
      <Configuration>Debug</Configuration>
      <Platform>x64</Platform>
    </ProjectConfiguration>
    <ProjectConfiguration Include="Release|x64">
      <Configuration>Release</Configuration>
      <Platform>x64</Platform>
    </ProjectConfiguration>
  </ItemGroup>
  <PropertyGroup Label="Globals">
    <ProjectGuid>{00000000-0000-0000-0000-000000000000}</ProjectGuid>
    <RootNamespace>Template</RootNamespace>
    <WindowsTargetPlatformVersion>10.0.17134.0</WindowsTargetPlatformVersion>
  </PropertyGroup>
  <Import Project="$(VCTargetsPath)\Microsoft.Cpp.Default.props" />
  <PropertyGroup Condition="'$(Configuration)|$(Platform)'=='Debug|Win32'" Label="Configuration">
    <ConfigurationType>Application</ConfigurationType>
    <UseDebugLibraries>true</UseDebugLibraries>
    <PlatformToolset>v141</PlatformToolset>
  </PropertyGroup>
  <PropertyGroup Condition="'$(Configuration)|$(Platform)'=='Release|Win32'" Label="Configuration">
    <ConfigurationType>Application</ConfigurationType>
    <UseDebugLibraries>false</UseDebugLibraries>
    <PlatformToolset>v141</PlatformToolset>
  </PropertyGroup>
  <Import Project="$(VCTargetsPath)\Microsoft.Cpp.props" />
  <ItemDefinitionGroup Condition="'$(Configuration)|$(Platform)'=='Debug|Win32'">
    <ClCompile>
      <WarningLevel>Level3</WarningLevel>
    </ClCompile>
  </ItemDefinitionGroup>
  <ItemGroup>
    <ClCompile Include="stale.cpp" />
    <ClInclude Include="stale.h" />
  </ItemGroup>
  <ItemGroup>
    <ProjectReference Include="..\Stale\Stale.vcxproj">
      <Project>{11111111-1111-1111-1111-111111111111}</Project>
    </ProjectReference>
  </ItemGroup>
  <Import Project="$(VCTargetsPath)\Microsoft.Cpp.targets" />
</Project>
"#;
}

/// The filters sidecar matching [`vcxproj::TEMPLATE`].
pub mod filters {
    pub const TEMPLATE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<Project ToolsVersion="4.0" xmlns="http://schemas.microsoft.com/developer/msbuild/2003">
  <ItemGroup>
    <Filter Include="Old">
      <UniqueIdentifier>{22222222-2222-2222-2222-222222222222}</UniqueIdentifier>
    </Filter>
  </ItemGroup>
  <ItemGroup>
    <ClCompile Include="old.cpp">
      <Filter>Old</Filter>
    </ClCompile>
  </ItemGroup>
</Project>
"#;
}

/// A solution with one stale project and x86/x64 configurations.
pub mod sln {
    pub const STALE_PROJECT: &str = "{AAAAAAAA-AAAA-AAAA-AAAA-AAAAAAAAAAAA}";

    pub const TEMPLATE: &str = "
Microsoft Visual Studio Solution File, Format Version 12.00
# Visual Studio 15
VisualStudioVersion = 15.0.28010.2016
MinimumVisualStudioVersion = 10.0.40219.1
Project(\"{8BC9CEB8-8B4A-11D0-8D11-00A0C91BC942}\") = \"Stale\", \"Stale.vcxproj\", \"{AAAAAAAA-AAAA-AAAA-AAAA-AAAAAAAAAAAA}\"
EndProject
Global
\tGlobalSection(SolutionConfigurationPlatforms) = preSolution
\t\tDebug|x64 = Debug|x64
\t\tDebug|x86 = Debug|x86
\tEndGlobalSection
\tGlobalSection(ProjectConfigurationPlatforms) = postSolution
\t\t{AAAAAAAA-AAAA-AAAA-AAAA-AAAAAAAAAAAA}.Debug|x64.ActiveCfg = Debug|x64
\tEndGlobalSection
\tGlobalSection(SolutionProperties) = preSolution
\t\tHideSolutionNode = FALSE
\tEndGlobalSection
\tGlobalSection(ExtensibilityGlobals) = postSolution
\t\tSolutionGuid = {BBBBBBBB-BBBB-BBBB-BBBB-BBBBBBBBBBBB}
\tEndGlobalSection
EndGlobal
";
}

/// `typeforge.toml` manifests.
pub mod manifests {
    /// A static library with sources under `src/` and headers under `include/`.
    pub fn library(name: &str) -> String {
        format!(
            r#"[project]
name = "{name}"
target-type = "StaticLibrary"

[[configuration]]
include-directories = ["include"]
files = ["src/**/*.c", "src/**/*.cpp", "include/**/*.h"]

[[configuration]]
matching-configuration-types = ["Release"]
defines = ["NDEBUG"]
"#
        )
    }
}
